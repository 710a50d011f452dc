//! Restore engine: unwrap a backup's key and decrypt it back to plaintext.

use std::fs;
use std::io;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use super::catalog::BackupCatalog;
use super::types::{BackupId, RestoreReport};
use crate::crypto::{cipher, wrap};
use crate::error::{CofferError, Result};
use crate::fs::{write_atomic, Visibility};
use crate::keys::KeyPairManager;
use crate::session::Session;

pub struct RestoreEngine<'a> {
    keys: &'a KeyPairManager,
    catalog: &'a BackupCatalog,
}

impl<'a> RestoreEngine<'a> {
    pub fn new(keys: &'a KeyPairManager, catalog: &'a BackupCatalog) -> Self {
        Self { keys, catalog }
    }

    /// Decrypt backup `name` into `output`, replacing any file there.
    ///
    /// Checks run in order: admin role, private key present, both artifacts
    /// present. Nothing is written unless the key unwraps and the
    /// ciphertext authenticates.
    pub fn restore_backup(
        &self,
        session: &Session,
        name: &str,
        output: &Path,
    ) -> Result<RestoreReport> {
        session.require_admin("restore backups")?;
        let private_key = self.keys.load_private_key()?;

        let id: BackupId = name
            .parse()
            .map_err(|_| CofferError::BackupNotFound(name.to_string()))?;
        let metadata = self.catalog.metadata(&id)?;
        let ciphertext = read_ciphertext(&id, self.catalog.backups_dir())?;

        let wrapped = STANDARD.decode(metadata.wrapped_key.trim()).map_err(|e| {
            CofferError::IntegrityFailure(format!("wrapped key is not valid base64: {}", e))
        })?;
        let key = wrap::unwrap_key(&private_key, &wrapped)?;
        let plaintext = Zeroizing::new(cipher::open(&key, &ciphertext)?);

        write_atomic(output, &plaintext, Visibility::Shared)?;

        tracing::info!(
            backup = %id,
            username = %session.username(),
            output = %output.display(),
            bytes = plaintext.len(),
            "restored backup"
        );
        Ok(RestoreReport {
            name: id,
            original_file_name: metadata.original_file_name,
            output_path: output.to_path_buf(),
            bytes_written: plaintext.len() as u64,
        })
    }
}

fn read_ciphertext(id: &BackupId, backups_dir: &Path) -> Result<Vec<u8>> {
    match fs::read(id.ciphertext_path(backups_dir)) {
        Ok(data) => Ok(data),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            Err(CofferError::BackupNotFound(id.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}
