//! RSA-2048 key pairs and OAEP key wrapping.
//!
//! Per-backup symmetric keys are wrapped with RSA-OAEP using SHA-256 for both
//! the hash and MGF1. Private keys serialize to PKCS#1 PEM ("RSA PRIVATE KEY"),
//! public keys to SubjectPublicKeyInfo PEM ("PUBLIC KEY").

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::cipher::SymmetricKey;
use crate::error::{CofferError, Result};

/// Modulus size in bits.
pub const RSA_BITS: usize = 2048;
/// Public exponent.
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Generate a fresh RSA private key (the public half is derived from it).
pub fn generate_private_key() -> Result<RsaPrivateKey> {
    let mut rng = rand::rngs::OsRng;
    RsaPrivateKey::new_with_exp(&mut rng, RSA_BITS, &BigUint::from(PUBLIC_EXPONENT))
        .map_err(|e| CofferError::Crypto(format!("RSA key generation failed: {}", e)))
}

/// Encode a private key as unencrypted PKCS#1 PEM.
pub fn private_key_to_pem(key: &RsaPrivateKey) -> Result<Zeroizing<String>> {
    key.to_pkcs1_pem(LineEnding::LF)
        .map_err(|e| CofferError::Crypto(format!("Private key encoding failed: {}", e)))
}

/// Encode a public key as SubjectPublicKeyInfo PEM.
pub fn public_key_to_pem(key: &RsaPublicKey) -> Result<String> {
    key.to_public_key_pem(LineEnding::LF)
        .map_err(|e| CofferError::Crypto(format!("Public key encoding failed: {}", e)))
}

/// Parse a PKCS#1 PEM private key.
pub fn private_key_from_pem(pem: &str) -> Result<RsaPrivateKey> {
    RsaPrivateKey::from_pkcs1_pem(pem)
        .map_err(|e| CofferError::Crypto(format!("Private key parse failed: {}", e)))
}

/// Parse a SubjectPublicKeyInfo PEM public key.
pub fn public_key_from_pem(pem: &str) -> Result<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .map_err(|e| CofferError::Crypto(format!("Public key parse failed: {}", e)))
}

/// Encrypt a symmetric key under `public_key` with OAEP(SHA-256, MGF1-SHA-256).
pub fn wrap_key(public_key: &RsaPublicKey, key: &SymmetricKey) -> Result<Vec<u8>> {
    let mut rng = rand::rngs::OsRng;
    public_key
        .encrypt(&mut rng, Oaep::new::<Sha256>(), key.as_bytes())
        .map_err(|e| CofferError::Crypto(format!("Key wrapping failed: {}", e)))
}

/// Recover a symmetric key wrapped by [`wrap_key`].
///
/// A wrapped key that was altered, or wrapped under another key pair, fails
/// with `IntegrityFailure`.
pub fn unwrap_key(private_key: &RsaPrivateKey, wrapped: &[u8]) -> Result<SymmetricKey> {
    if wrapped.len() != private_key.size() {
        return Err(CofferError::IntegrityFailure(format!(
            "wrapped key has {} bytes, expected {}",
            wrapped.len(),
            private_key.size()
        )));
    }
    let bytes = Zeroizing::new(
        private_key
            .decrypt(Oaep::new::<Sha256>(), wrapped)
            .map_err(|_| {
                CofferError::IntegrityFailure(
                    "wrapped key rejected by the private key".to_string(),
                )
            })?,
    );
    SymmetricKey::from_slice(&bytes)
}
