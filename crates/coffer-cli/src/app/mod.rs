//! Application-level utilities for the Coffer CLI.
//!
//! - Path resolution for the config file and vault root
//! - Password and key passphrase input
//! - The per-invocation context handed to command handlers

mod context;
mod credentials;
mod resolver;

pub use context::AppContext;
pub use credentials::read_new_password;
pub use resolver::resolve_config_path;
