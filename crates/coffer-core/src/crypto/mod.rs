//! Cryptographic operations for Coffer.
//!
//! This module provides the primitives the vault is built from, using
//! well-audited RustCrypto implementations:
//! - **PBKDF2-HMAC-SHA256**: account password derivation (100,000 iterations)
//! - **AES-256-GCM**: per-backup authenticated encryption
//! - **RSA-2048 OAEP (SHA-256)**: wrapping of per-backup keys
//! - **Age**: optional passphrase sealing of the private key file
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of backup artifacts without the private key
//! - Tampering with ciphertext or wrapped keys (detected, never decrypted)
//! - Offline brute-force of stolen account tables (slow, salted KDF)
//!
//! We do NOT defend against:
//! - Filesystem compromise while the private key is stored unsealed
//!   (the default; every backup is then readable)
//! - Compromised OS / keylogger

pub mod cipher;
pub mod kdf;
pub mod passphrase;
pub mod sealed;
pub mod wrap;

pub use cipher::SymmetricKey;
pub use kdf::{derive_key, generate_salt, DerivedKey};
pub use passphrase::{validate_key_passphrase, validate_password, validate_username};
