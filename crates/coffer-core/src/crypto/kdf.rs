//! Password key derivation using PBKDF2-HMAC-SHA256.
//!
//! Account passwords are never stored. Registration stores a random salt and
//! the key derived from password + salt; authentication re-derives and
//! compares in constant time.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::ZeroizeOnDrop;

/// PBKDF2 iteration count. Changing this invalidates every stored account.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt length in bytes, generated fresh per account.
pub const SALT_LENGTH: usize = 16;

/// Length of derived key in bytes.
pub const KEY_LENGTH: usize = 32;

/// A key derived from an account password.
///
/// Zeroized on drop. Equality is only available through
/// [`DerivedKey::matches`], which runs in constant time.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Get a reference to the raw key bytes.
    ///
    /// Avoid storing or logging this value outside the account table.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// Constant-time comparison against a stored key.
    ///
    /// A stored value of the wrong length never matches.
    pub fn matches(&self, stored: &[u8]) -> bool {
        self.key.as_slice().ct_eq(stored).into()
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Generate a fresh random salt.
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive a key from a password and salt.
///
/// Deterministic: the same password and salt always yield the same key.
pub fn derive_key(password: &str, salt: &[u8]) -> DerivedKey {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    DerivedKey { key }
}
