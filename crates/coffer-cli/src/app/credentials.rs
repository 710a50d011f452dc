//! Password and key passphrase input.

use dialoguer::Password;
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::constants::env;
use crate::errors::CliError;

fn env_secret(name: &str) -> Option<Zeroizing<String>> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .map(Zeroizing::new)
}

/// Read an account password from COFFER_PASSWORD or a prompt.
pub fn read_password(username: &str, interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(password) = env_secret(env::PASSWORD) {
        return Ok(password);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            env::PASSWORD
        ))
        .into());
    }
    Password::new()
        .with_prompt(format!("Password for {}", username))
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Read a new account password, confirming it when prompting.
pub fn read_new_password(username: &str, interactive: bool) -> anyhow::Result<Zeroizing<String>> {
    if let Some(password) = env_secret(env::PASSWORD) {
        return Ok(password);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No password provided and no TTY available. Set {}.",
            env::PASSWORD
        ))
        .into());
    }
    Password::new()
        .with_prompt(format!("New password for {}", username))
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Private key passphrase from COFFER_KEY_PASSPHRASE, if set.
pub fn key_passphrase() -> Option<SecretString> {
    env_secret(env::KEY_PASSPHRASE).map(|value| SecretString::from(value.to_string()))
}
