//! Backup engine: encrypt a file into a new backup unit.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;

use super::types::{
    BackupId, BackupInfo, BackupMetadata, CIPHER_LABEL, KEY_WRAP_LABEL, METADATA_VERSION,
};
use crate::crypto::{cipher, wrap, SymmetricKey};
use crate::error::{CofferError, Result};
use crate::fs::{write_atomic, write_atomic_new, Visibility};
use crate::keys::KeyPairManager;

/// Produces backup units under a backups directory.
pub struct BackupEngine<'a> {
    keys: &'a KeyPairManager,
    backups_dir: PathBuf,
}

impl<'a> BackupEngine<'a> {
    pub fn new(keys: &'a KeyPairManager, backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            keys,
            backups_dir: backups_dir.into(),
        }
    }

    /// Back up `source` under a freshly generated unique name.
    pub fn create_backup(&self, source: &Path) -> Result<BackupInfo> {
        self.create(source, None)
    }

    /// Back up `source` under a caller-chosen name.
    ///
    /// Fails with `DuplicateBackup` if a unit with that name exists.
    pub fn create_backup_named(&self, source: &Path, name: &BackupId) -> Result<BackupInfo> {
        self.create(source, Some(name))
    }

    fn create(&self, source: &Path, name: Option<&BackupId>) -> Result<BackupInfo> {
        let public_key = self.keys.load_public_key()?;
        let plaintext = read_source(source)?;

        let id = match name {
            Some(name) => {
                if self.exists(name) {
                    return Err(CofferError::DuplicateBackup(name.to_string()));
                }
                name.clone()
            }
            None => self.fresh_id(),
        };

        let key = SymmetricKey::generate();
        let ciphertext = cipher::seal(&key, &plaintext)?;
        let wrapped = wrap::wrap_key(&public_key, &key)?;

        let metadata = BackupMetadata {
            original_file_name: original_file_name(source),
            wrapped_key: STANDARD.encode(&wrapped),
            version: METADATA_VERSION,
            cipher: CIPHER_LABEL.to_string(),
            key_wrap: KEY_WRAP_LABEL.to_string(),
            created_at: Some(Utc::now()),
            size: Some(plaintext.len() as u64),
        };

        self.persist(&id, &ciphertext, &metadata)?;

        tracing::info!(
            backup = %id,
            original = %metadata.original_file_name,
            bytes = plaintext.len(),
            "created backup"
        );
        Ok(BackupInfo::from_metadata(id, &metadata))
    }

    fn exists(&self, id: &BackupId) -> bool {
        id.metadata_path(&self.backups_dir).exists()
            || id.ciphertext_path(&self.backups_dir).exists()
    }

    fn fresh_id(&self) -> BackupId {
        loop {
            let id = BackupId::generate();
            if !self.exists(&id) {
                return id;
            }
        }
    }

    /// Publish the ciphertext, then the sidecar. The catalog keys off
    /// sidecars, so a unit only becomes visible once both are in place.
    ///
    /// Publishing the ciphertext claims the name: when another writer
    /// got there first this fails with `DuplicateBackup` and writes nothing.
    fn persist(&self, id: &BackupId, ciphertext: &[u8], metadata: &BackupMetadata) -> Result<()> {
        fs::create_dir_all(&self.backups_dir)?;

        let ciphertext_path = id.ciphertext_path(&self.backups_dir);
        if !write_atomic_new(&ciphertext_path, ciphertext, Visibility::Shared)? {
            return Err(CofferError::DuplicateBackup(id.to_string()));
        }

        let metadata_path = id.metadata_path(&self.backups_dir);
        let written = serde_json::to_vec_pretty(metadata)
            .map_err(CofferError::from)
            .and_then(|json| write_atomic(&metadata_path, &json, Visibility::Shared));
        if let Err(err) = written {
            let _ = fs::remove_file(&ciphertext_path);
            return Err(err);
        }

        tracing::debug!(
            ciphertext = %ciphertext_path.display(),
            metadata = %metadata_path.display(),
            "backup artifacts written"
        );
        Ok(())
    }
}

fn read_source(source: &Path) -> Result<Vec<u8>> {
    let metadata = match fs::metadata(source) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CofferError::SourceNotFound(source.to_path_buf()))
        }
        Err(err) => return Err(err.into()),
    };
    if !metadata.is_file() {
        return Err(CofferError::InvalidInput(format!(
            "Not a regular file: {}",
            source.display()
        )));
    }
    Ok(fs::read(source)?)
}

fn original_file_name(source: &Path) -> String {
    source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CofferConfig;
    use tempfile::tempdir;

    #[test]
    fn test_missing_key_pair_checked_before_source() {
        let dir = tempdir().unwrap();
        let config = CofferConfig::new(dir.path());
        let keys = KeyPairManager::from_config(&config);
        let engine = BackupEngine::new(&keys, config.backups_dir());

        let err = engine
            .create_backup(&dir.path().join("does-not-exist.txt"))
            .unwrap_err();
        assert!(matches!(err, CofferError::MissingKeyPair));
        assert!(!config.backups_dir().exists());
    }

    #[test]
    fn test_original_file_name_is_base_name() {
        assert_eq!(
            original_file_name(Path::new("/home/alice/docs/report.pdf")),
            "report.pdf"
        );
        assert_eq!(original_file_name(Path::new("notes.txt")), "notes.txt");
    }

    #[test]
    fn test_read_source_distinguishes_missing_and_directory() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            read_source(&dir.path().join("missing")),
            Err(CofferError::SourceNotFound(_))
        ));
        assert!(matches!(
            read_source(dir.path()),
            Err(CofferError::InvalidInput(_))
        ));
    }
}
