//! CLI error types for structured error handling.
//!
//! Core errors are classified here into exit codes so every command
//! reports failures the same way.

use std::fmt;

use coffer_core::CofferError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, vault, backup, source file)
    NotFound { message: String, hint: String },

    /// Authentication failed or the user lacks the required role
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for a core error.
pub fn core_exit_code(err: &CofferError) -> i32 {
    match err {
        CofferError::SourceNotFound(_)
        | CofferError::BackupNotFound(_)
        | CofferError::MissingKeyPair
        | CofferError::MissingPrivateKey => exit_codes::NOT_FOUND,
        CofferError::DuplicateUser(_)
        | CofferError::InvalidRole(_)
        | CofferError::DuplicateBackup(_)
        | CofferError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        CofferError::AuthenticationFailed
        | CofferError::Unauthorized { .. }
        | CofferError::PrivateKeyLocked
        | CofferError::IncorrectPassphrase => exit_codes::AUTH_FAILED,
        CofferError::IntegrityFailure(_) => exit_codes::INTEGRITY_FAILED,
        CofferError::CorruptRecord { .. }
        | CofferError::Crypto(_)
        | CofferError::Io { .. }
        | CofferError::Json { .. } => exit_codes::FAILURE,
    }
}

/// Exit code for any error surfaced by a command.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    if let Some(core) = err.downcast_ref::<CofferError>() {
        return core_exit_code(core);
    }
    exit_codes::FAILURE
}

/// Contextual hint for a core error, if one helps.
pub fn core_hint(err: &CofferError) -> Option<&'static str> {
    match err {
        CofferError::MissingKeyPair | CofferError::MissingPrivateKey => {
            Some("Hint: An admin must run `coffer keygen` first.")
        }
        CofferError::BackupNotFound(_) => Some("Hint: Run `coffer list` to see backup names."),
        CofferError::AuthenticationFailed => {
            Some("Hint: Check --user and the password (or COFFER_PASSWORD).")
        }
        CofferError::PrivateKeyLocked | CofferError::IncorrectPassphrase => {
            Some("Hint: Set COFFER_KEY_PASSPHRASE to the passphrase used at keygen.")
        }
        CofferError::IntegrityFailure(_) => {
            Some("Hint: The backup was modified or was made under a different key pair.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        assert_eq!(
            core_exit_code(&CofferError::BackupNotFound("x".into())),
            exit_codes::NOT_FOUND
        );
        assert_eq!(
            core_exit_code(&CofferError::SourceNotFound(PathBuf::from("x"))),
            exit_codes::NOT_FOUND
        );
        assert_eq!(
            core_exit_code(&CofferError::Unauthorized {
                action: "restore backups"
            }),
            exit_codes::AUTH_FAILED
        );
        assert_eq!(
            core_exit_code(&CofferError::IntegrityFailure("tag".into())),
            exit_codes::INTEGRITY_FAILED
        );
        assert_eq!(
            core_exit_code(&CofferError::DuplicateUser("alice".into())),
            exit_codes::INVALID_INPUT
        );
    }

    #[test]
    fn test_anyhow_downcast_keeps_code() {
        let err = anyhow::Error::new(CofferError::AuthenticationFailed);
        assert_eq!(exit_code_for(&err), exit_codes::AUTH_FAILED);

        let err = anyhow::Error::new(CliError::invalid_input("bad"));
        assert_eq!(exit_code_for(&err), exit_codes::INVALID_INPUT);

        let err = anyhow::anyhow!("anything else");
        assert_eq!(exit_code_for(&err), exit_codes::FAILURE);
    }

    #[test]
    fn test_not_found_display_includes_hint() {
        let err = CliError::not_found("No vault", "Run coffer init");
        assert_eq!(err.to_string(), "No vault\nRun coffer init");
    }
}
