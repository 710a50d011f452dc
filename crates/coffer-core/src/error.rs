//! Error types for Coffer core operations.
//!
//! Every failure path in the core produces one of these variants; nothing is
//! printed and nothing terminates the process. The CLI layer maps them to
//! user-facing messages and exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Coffer operations.
pub type Result<T> = std::result::Result<T, CofferError>;

/// Core error type for Coffer operations.
#[derive(Debug, Error)]
pub enum CofferError {
    /// An account with this username already exists
    #[error("User already exists: {0}")]
    DuplicateUser(String),

    /// Role is not one of `admin` or `user`
    #[error("Invalid role: {0} (expected admin or user)")]
    InvalidRole(String),

    /// The session's role does not permit the operation
    #[error("Unauthorized: only an admin can {action}")]
    Unauthorized { action: &'static str },

    /// Username/password pair did not verify
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// No public key has been generated yet
    #[error("Key pair not found; an admin must generate keys first")]
    MissingKeyPair,

    /// No private key is available to unwrap backup keys
    #[error("Private key not found; an admin must generate keys first")]
    MissingPrivateKey,

    /// The private key is sealed and no passphrase was supplied
    #[error("Private key is passphrase-protected; a key passphrase is required")]
    PrivateKeyLocked,

    /// The key passphrase did not open the sealed private key
    #[error("Incorrect key passphrase")]
    IncorrectPassphrase,

    /// The file to back up does not exist
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// No backup unit with this name
    #[error("Backup not found: {0}")]
    BackupNotFound(String),

    /// A backup with the requested name already exists
    #[error("Backup already exists: {0}")]
    DuplicateBackup(String),

    /// Authenticated decryption or key unwrapping rejected the data
    #[error("Integrity check failed: {0}")]
    IntegrityFailure(String),

    /// A persisted record could not be interpreted
    #[error("Corrupt record {}: {reason}", path.display())]
    CorruptRecord { path: PathBuf, reason: String },

    /// Cryptographic primitive failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl CofferError {
    /// True for failures that mean the stored data was tampered with or
    /// encrypted under a different key.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, CofferError::IntegrityFailure(_))
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CofferError::CorruptRecord {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
