//! Backup unit identifiers and sidecar records.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CofferError;

/// Extension of the ciphertext artifact.
pub const CIPHERTEXT_EXTENSION: &str = "bin";
/// Extension of the sidecar metadata artifact.
pub const METADATA_EXTENSION: &str = "json";

/// Current sidecar format version.
pub const METADATA_VERSION: u32 = 1;
/// Cipher label recorded in sidecars.
pub const CIPHER_LABEL: &str = "AES-256-GCM";
/// Key wrapping label recorded in sidecars.
pub const KEY_WRAP_LABEL: &str = "RSA-OAEP-SHA256";

const MAX_ID_LENGTH: usize = 128;

/// Name of a backup unit; both artifacts share it as their base name.
///
/// Valid ids are 1..=128 characters from `[A-Za-z0-9._-]` and do not start
/// with `.`, so an id can never escape the backups directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackupId(String);

impl BackupId {
    /// Generate a unique, time-ordered id:
    /// `backup-<yyyymmddThhmmssmmmZ>-<8 hex>`.
    ///
    /// Within a process the millisecond stamp strictly increases between
    /// calls, so ids sort in the order they were generated.
    pub fn generate() -> Self {
        Self::generate_at(next_stamp(Utc::now()))
    }

    pub(crate) fn generate_at(now: DateTime<Utc>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        BackupId(format!(
            "backup-{}-{}",
            now.format("%Y%m%dT%H%M%S%3fZ"),
            &suffix[..8]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ciphertext artifact path inside `dir`.
    pub fn ciphertext_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{}", self.0, CIPHERTEXT_EXTENSION))
    }

    /// Sidecar artifact path inside `dir`.
    pub fn metadata_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{}", self.0, METADATA_EXTENSION))
    }
}

/// Last millisecond stamp handed out by [`BackupId::generate`].
static LAST_STAMP_MILLIS: AtomicI64 = AtomicI64::new(i64::MIN);

/// `now` truncated to milliseconds, bumped past the previous stamp if needed.
fn next_stamp(now: DateTime<Utc>) -> DateTime<Utc> {
    let now_millis = now.timestamp_millis();
    let issue = |last: i64| now_millis.max(last.saturating_add(1));
    let last = LAST_STAMP_MILLIS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(issue(last)))
        .unwrap_or_else(|last| last);
    DateTime::from_timestamp_millis(issue(last)).unwrap_or(now)
}

impl FromStr for BackupId {
    type Err = CofferError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let valid_chars = value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if value.is_empty() || value.len() > MAX_ID_LENGTH || !valid_chars || value.starts_with('.')
        {
            return Err(CofferError::InvalidInput(format!(
                "Invalid backup name {:?}: use 1-{} characters from A-Z a-z 0-9 . _ - (not starting with .)",
                value, MAX_ID_LENGTH
            )));
        }
        Ok(BackupId(value.to_string()))
    }
}

impl TryFrom<String> for BackupId {
    type Error = CofferError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackupId> for String {
    fn from(id: BackupId) -> Self {
        id.0
    }
}

impl fmt::Display for BackupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sidecar record written next to each ciphertext artifact.
///
/// `original_file` and `encrypted_key` are the required fields; the rest
/// describe the unit and default sensibly when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    #[serde(rename = "original_file")]
    pub original_file_name: String,
    /// Base64 of the RSA-OAEP wrapped symmetric key
    #[serde(rename = "encrypted_key")]
    pub wrapped_key: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_cipher")]
    pub cipher: String,
    #[serde(default = "default_key_wrap")]
    pub key_wrap: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Plaintext size in bytes
    #[serde(default)]
    pub size: Option<u64>,
}

fn default_version() -> u32 {
    METADATA_VERSION
}

fn default_cipher() -> String {
    CIPHER_LABEL.to_string()
}

fn default_key_wrap() -> String {
    KEY_WRAP_LABEL.to_string()
}

/// Summary of a backup unit for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupInfo {
    pub name: BackupId,
    pub original_file_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size: Option<u64>,
}

impl BackupInfo {
    pub(crate) fn from_metadata(name: BackupId, metadata: &BackupMetadata) -> Self {
        Self {
            name,
            original_file_name: metadata.original_file_name.clone(),
            created_at: metadata.created_at,
            size: metadata.size,
        }
    }
}

/// Outcome of a successful restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub name: BackupId,
    pub original_file_name: String,
    pub output_path: PathBuf,
    pub bytes_written: u64,
}
