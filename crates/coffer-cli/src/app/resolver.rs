//! Path resolution for the config file and vault root.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, CliConfig};
use crate::constants::env;
use crate::errors::CliError;

/// Resolve the config file path, checking COFFER_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(env::CONFIG) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Read the config file if one exists.
pub fn load_config() -> anyhow::Result<Option<CliConfig>> {
    let path = resolve_config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    read_config(&path).map(Some)
}

/// Resolve the vault root: `--root`/COFFER_ROOT, then the config file.
pub fn resolve_vault_root(cli: &Cli, config: Option<&CliConfig>) -> anyhow::Result<PathBuf> {
    if let Some(root) = cli.root.as_deref() {
        if !root.trim().is_empty() {
            return Ok(PathBuf::from(root));
        }
    }

    match config {
        Some(config) => Ok(PathBuf::from(&config.vault.root)),
        None => {
            let config_path = resolve_config_path()?;
            Err(CliError::not_found(
                format!("No vault configured ({} not found)", config_path.display()),
                missing_vault_hint(),
            )
            .into())
        }
    }
}

/// Error message when the configured vault root is gone.
pub fn missing_vault_message(root: &Path) -> String {
    format!("No vault found at {}", root.display())
}

pub fn missing_vault_hint() -> &'static str {
    "Hint: Run `coffer init`, or point at a vault with --root / COFFER_ROOT."
}
