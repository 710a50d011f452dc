//! Optional passphrase sealing for the private key file.
//!
//! By default the private key is stored as plain PEM. When a key passphrase
//! is configured, the PEM is wrapped in an Age passphrase envelope (scrypt)
//! before it touches disk. Sealed files are recognised by the Age header.

use std::io::{Read, Write};
use std::iter;

use age::secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::error::{CofferError, Result};

const AGE_HEADER: &[u8] = b"age-encryption.org/";

fn duplicate(passphrase: &SecretString) -> SecretString {
    SecretString::from(passphrase.expose_secret().to_string())
}

/// Whether `data` is an Age envelope rather than plain PEM.
pub fn is_sealed(data: &[u8]) -> bool {
    data.starts_with(AGE_HEADER)
}

/// Seal `data` under `passphrase`.
pub fn seal(data: &[u8], passphrase: &SecretString) -> Result<Vec<u8>> {
    let encryptor = age::Encryptor::with_user_passphrase(duplicate(passphrase));

    let mut encrypted = Vec::new();
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .map_err(|e| CofferError::Crypto(format!("Failed to create encryptor: {}", e)))?;

    writer
        .write_all(data)
        .map_err(|e| CofferError::Crypto(format!("Encryption write failed: {}", e)))?;

    writer
        .finish()
        .map_err(|e| CofferError::Crypto(format!("Encryption finish failed: {}", e)))?;

    Ok(encrypted)
}

/// Open data sealed by [`seal`].
///
/// A wrong passphrase yields `IncorrectPassphrase`; a damaged envelope
/// yields `IntegrityFailure`.
pub fn open(sealed: &[u8], passphrase: &SecretString) -> Result<Zeroizing<Vec<u8>>> {
    let decryptor = age::Decryptor::new(sealed).map_err(|e| {
        CofferError::IntegrityFailure(format!("Sealed key header unreadable: {}", e))
    })?;

    let identity = age::scrypt::Identity::new(duplicate(passphrase));
    let mut reader = decryptor
        .decrypt(iter::once(&identity as &dyn age::Identity))
        .map_err(|e| match e {
            age::DecryptError::NoMatchingKeys
            | age::DecryptError::DecryptionFailed
            | age::DecryptError::KeyDecryptionFailed => CofferError::IncorrectPassphrase,
            _ => CofferError::IntegrityFailure(format!("Sealed key rejected: {}", e)),
        })?;

    let mut decrypted = Zeroizing::new(Vec::new());
    reader.read_to_end(&mut decrypted).map_err(|e| {
        CofferError::IntegrityFailure(format!("Sealed key payload corrupted: {}", e))
    })?;

    Ok(decrypted)
}
