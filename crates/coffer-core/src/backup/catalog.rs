//! Backup catalog: enumerate backup units by their sidecar records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::types::{BackupId, BackupInfo, BackupMetadata, METADATA_EXTENSION};
use crate::error::{CofferError, Result};

/// Read-only view over a backups directory.
pub struct BackupCatalog {
    backups_dir: PathBuf,
}

impl BackupCatalog {
    pub fn new(backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            backups_dir: backups_dir.into(),
        }
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Names of all backup units, sorted lexicographically (generated names
    /// therefore sort oldest first).
    ///
    /// Returns an empty list when the directory does not exist. Files whose
    /// stem is not a valid backup name are ignored.
    pub fn list(&self) -> Result<Vec<BackupId>> {
        let entries = match fs::read_dir(&self.backups_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(METADATA_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if let Ok(id) = stem.parse::<BackupId>() {
                ids.push(id);
            }
        }
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    /// Read the sidecar record of one unit.
    ///
    /// Fails with `BackupNotFound` if the unit has no sidecar.
    pub fn metadata(&self, id: &BackupId) -> Result<BackupMetadata> {
        let path = id.metadata_path(&self.backups_dir);
        let contents = match fs::read(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CofferError::BackupNotFound(id.to_string()))
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&contents).map_err(|e| CofferError::corrupt(&path, e))
    }

    /// Summary of one unit.
    pub fn info(&self, id: &BackupId) -> Result<BackupInfo> {
        let metadata = self.metadata(id)?;
        Ok(BackupInfo::from_metadata(id.clone(), &metadata))
    }

    /// Summaries of every readable unit, in [`BackupCatalog::list`] order.
    ///
    /// Units whose sidecar cannot be read are skipped with a warning.
    pub fn details(&self) -> Result<Vec<BackupInfo>> {
        let mut infos = Vec::new();
        for id in self.list()? {
            match self.info(&id) {
                Ok(info) => infos.push(info),
                Err(err) => tracing::warn!(backup = %id, "skipping unreadable backup: {}", err),
            }
        }
        Ok(infos)
    }
}
