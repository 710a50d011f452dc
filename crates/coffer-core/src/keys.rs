//! Key-pair manager: the single system-wide RSA key pair.
//!
//! The private key is stored as unencrypted PKCS#1 PEM unless a key
//! passphrase is configured, in which case it is Age-sealed. Storing it
//! unsealed is an accepted limitation: anyone who can read the vault
//! directory can then decrypt every backup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rsa::{RsaPrivateKey, RsaPublicKey};
use secrecy::SecretString;

use crate::config::CofferConfig;
use crate::crypto::{sealed, wrap};
use crate::error::{CofferError, Result};
use crate::fs::{write_atomic, Visibility};
use crate::session::Session;

/// Where a freshly generated key pair was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairInfo {
    pub public_key_path: PathBuf,
    pub private_key_path: PathBuf,
    pub sealed: bool,
}

/// Presence of the key files on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPairStatus {
    pub public_key_present: bool,
    pub private_key_present: bool,
    pub private_key_sealed: bool,
}

/// Generates, persists and loads the vault key pair.
pub struct KeyPairManager {
    public_path: PathBuf,
    private_path: PathBuf,
    passphrase: Option<SecretString>,
}

impl KeyPairManager {
    pub fn new(public_path: impl Into<PathBuf>, private_path: impl Into<PathBuf>) -> Self {
        Self {
            public_path: public_path.into(),
            private_path: private_path.into(),
            passphrase: None,
        }
    }

    pub fn from_config(config: &CofferConfig) -> Self {
        Self::new(config.public_key_path(), config.private_key_path())
    }

    /// Seal newly generated private keys under `passphrase`, and use it to
    /// open sealed ones.
    pub fn set_passphrase(&mut self, passphrase: SecretString) {
        self.passphrase = Some(passphrase);
    }

    pub fn public_key_path(&self) -> &Path {
        &self.public_path
    }

    pub fn private_key_path(&self) -> &Path {
        &self.private_path
    }

    /// Generate a new RSA-2048 pair, replacing any existing one.
    ///
    /// The private key is written first so that a reader never sees a
    /// public key without its matching private key. Each file is published
    /// by atomic rename.
    pub fn generate(&self, session: &Session) -> Result<KeyPairInfo> {
        session.require_admin("generate keys")?;

        let private_key = wrap::generate_private_key()?;
        let public_key = RsaPublicKey::from(&private_key);

        let private_pem = wrap::private_key_to_pem(&private_key)?;
        let public_pem = wrap::public_key_to_pem(&public_key)?;

        let is_sealed = self.passphrase.is_some();
        match &self.passphrase {
            Some(passphrase) => {
                let sealed_pem = sealed::seal(private_pem.as_bytes(), passphrase)?;
                write_atomic(&self.private_path, &sealed_pem, Visibility::Private)?;
            }
            None => write_atomic(&self.private_path, private_pem.as_bytes(), Visibility::Private)?,
        }
        write_atomic(&self.public_path, public_pem.as_bytes(), Visibility::Private)?;

        tracing::info!(
            username = %session.username(),
            sealed = is_sealed,
            "generated RSA key pair"
        );
        tracing::debug!(
            public = %self.public_path.display(),
            private = %self.private_path.display(),
            "key files written"
        );

        Ok(KeyPairInfo {
            public_key_path: self.public_path.clone(),
            private_key_path: self.private_path.clone(),
            sealed: is_sealed,
        })
    }

    /// Load the public key used to wrap backup keys.
    ///
    /// Fails with `MissingKeyPair` if no pair has been generated.
    pub fn load_public_key(&self) -> Result<RsaPublicKey> {
        let pem = match fs::read_to_string(&self.public_path) {
            Ok(pem) => pem,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CofferError::MissingKeyPair)
            }
            Err(err) => return Err(err.into()),
        };
        wrap::public_key_from_pem(&pem).map_err(|e| CofferError::corrupt(&self.public_path, e))
    }

    /// Load the private key used to unwrap backup keys.
    ///
    /// Fails with `MissingPrivateKey` if absent, and with `PrivateKeyLocked`
    /// if the key is sealed and no passphrase is configured.
    pub fn load_private_key(&self) -> Result<RsaPrivateKey> {
        let raw = match fs::read(&self.private_path) {
            Ok(raw) => zeroize::Zeroizing::new(raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CofferError::MissingPrivateKey)
            }
            Err(err) => return Err(err.into()),
        };

        let pem_bytes = if sealed::is_sealed(&raw) {
            let passphrase = self
                .passphrase
                .as_ref()
                .ok_or(CofferError::PrivateKeyLocked)?;
            sealed::open(&raw, passphrase)?
        } else {
            raw
        };

        let pem = std::str::from_utf8(&pem_bytes)
            .map_err(|e| CofferError::corrupt(&self.private_path, e))?;
        wrap::private_key_from_pem(pem).map_err(|e| CofferError::corrupt(&self.private_path, e))
    }

    /// Report which key files exist.
    pub fn status(&self) -> Result<KeyPairStatus> {
        let private_key_present = self.private_path.exists();
        let private_key_sealed = if private_key_present {
            sealed::is_sealed(&fs::read(&self.private_path)?)
        } else {
            false
        };
        Ok(KeyPairStatus {
            public_key_present: self.public_path.exists(),
            private_key_present,
            private_key_sealed,
        })
    }
}
