//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (I/O, corrupt records, anything unclassified)
/// - 2: Misuse of shell command (reserved by shells and clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (config, source file, backup, key pair).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed or the session lacks the required role.
    pub const AUTH_FAILED: i32 = 5;

    /// A backup or key failed its integrity check.
    pub const INTEGRITY_FAILED: i32 = 6;
}

/// Environment variables read by the CLI.
pub mod env {
    pub const CONFIG: &str = "COFFER_CONFIG";
    pub const PASSWORD: &str = "COFFER_PASSWORD";
    pub const KEY_PASSPHRASE: &str = "COFFER_KEY_PASSPHRASE";
    pub const LOG: &str = "COFFER_LOG";
}

/// Log filter used when neither flags, env nor config set one.
pub const DEFAULT_LOG_FILTER: &str = "warn";
