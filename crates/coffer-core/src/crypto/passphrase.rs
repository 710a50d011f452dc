//! Credential input validation.

use crate::error::{CofferError, Result};

/// Minimum key passphrase length in characters.
const MIN_KEY_PASSPHRASE_LENGTH: usize = 8;

/// Maximum username length in characters.
const MAX_USERNAME_LENGTH: usize = 64;

/// Validate a username for registration.
///
/// Usernames are used verbatim as account table keys; they must be non-blank,
/// carry no surrounding whitespace or control characters, and stay short.
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(CofferError::InvalidInput(
            "Username cannot be empty".to_string(),
        ));
    }
    if username.trim() != username {
        return Err(CofferError::InvalidInput(
            "Username cannot start or end with whitespace".to_string(),
        ));
    }
    if username.chars().any(char::is_control) {
        return Err(CofferError::InvalidInput(
            "Username cannot contain control characters".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CofferError::InvalidInput(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    Ok(())
}

/// Validate an account password for registration.
pub fn validate_password(password: &str) -> Result<()> {
    if password.is_empty() {
        return Err(CofferError::InvalidInput(
            "Password cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate a passphrase used to seal the private key.
///
/// # Requirements
///
/// - At least 8 characters long
/// - Not empty or only whitespace
pub fn validate_key_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(CofferError::InvalidInput(
            "Key passphrase cannot be empty".to_string(),
        ));
    }

    if passphrase.chars().count() < MIN_KEY_PASSPHRASE_LENGTH {
        return Err(CofferError::InvalidInput(format!(
            "Key passphrase must be at least {} characters (got {})",
            MIN_KEY_PASSPHRASE_LENGTH,
            passphrase.chars().count()
        )));
    }

    Ok(())
}
