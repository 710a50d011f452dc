//! UI primitives for the Coffer CLI.
//!
//! - **Context**: terminal detection (color, unicode, animation)
//! - **Mode**: output mode and list format
//! - **Theme**: badges and styles
//! - **Render**: tables, receipts, hints, errors
//! - **Progress**: spinner for slow steps
//! - **Format**: sizes and timestamps

mod context;
pub mod format;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use mode::{ListFormat, OutputMode};
pub use progress::Spinner;
pub use render::{hint, kv, print_error, print_warning, receipt, table};
