//! Backup units: creation, restoration and cataloguing.
//!
//! A backup unit is two artifacts sharing a base name in the backups
//! directory:
//!
//! - `<name>.bin`: `[nonce][AES-256-GCM ciphertext][tag]`
//! - `<name>.json`: sidecar with the original file name and the
//!   RSA-OAEP wrapped symmetric key (base64)

mod catalog;
mod engine;
mod restore;
mod types;

pub use catalog::BackupCatalog;
pub use engine::BackupEngine;
pub use restore::RestoreEngine;
pub use types::{
    BackupId, BackupInfo, BackupMetadata, RestoreReport, CIPHERTEXT_EXTENSION, CIPHER_LABEL,
    KEY_WRAP_LABEL, METADATA_EXTENSION, METADATA_VERSION,
};
