//! Vault location and the well-known artifact paths beneath it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Account table file name.
pub const ACCOUNTS_FILE: &str = "users.json";
/// Public key file name (SubjectPublicKeyInfo PEM).
pub const PUBLIC_KEY_FILE: &str = "public.pem";
/// Private key file name (PKCS#1 PEM, optionally age-sealed).
pub const PRIVATE_KEY_FILE: &str = "private.pem";
/// Directory holding backup units.
pub const BACKUPS_DIR: &str = "backups";

/// Configuration for a vault rooted at a single directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CofferConfig {
    /// Directory containing the account table, key files and backups
    pub root: PathBuf,
}

impl CofferConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn accounts_path(&self) -> PathBuf {
        self.root.join(ACCOUNTS_FILE)
    }

    pub fn public_key_path(&self) -> PathBuf {
        self.root.join(PUBLIC_KEY_FILE)
    }

    pub fn private_key_path(&self) -> PathBuf {
        self.root.join(PRIVATE_KEY_FILE)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.root.join(BACKUPS_DIR)
    }
}
