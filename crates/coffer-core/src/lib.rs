//! # Coffer Core
//!
//! Core library for Coffer - hybrid-encrypted file backups with role-gated
//! restore.
//!
//! This crate holds all cryptographic state and domain logic. It never
//! prints; every operation returns a typed result for the presentation
//! layer to render.
//!
//! ## Architecture
//!
//! - **accounts**: credential store (salted PBKDF2 derived keys, roles)
//! - **keys**: the system-wide RSA-2048 key pair
//! - **backup**: backup engine, restore engine and catalog
//! - **session**: explicit authenticated context for authorization
//! - **vault**: facade wiring the above to one root directory
//!
//! ## Flow
//!
//! Register and log in, have an admin generate the key pair once, then any
//! user can create backups. Each backup gets a fresh AES-256-GCM key which is
//! wrapped with RSA-OAEP under the public key. Restoring requires an admin
//! session and the private key.

pub mod accounts;
pub mod backup;
pub mod config;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod keys;
pub mod session;
pub mod vault;

pub use accounts::{CredentialStore, Role};
pub use backup::{BackupCatalog, BackupId, BackupInfo, RestoreReport};
pub use config::CofferConfig;
pub use error::{CofferError, Result};
pub use keys::{KeyPairInfo, KeyPairManager, KeyPairStatus};
pub use session::Session;
pub use vault::Vault;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
