//! Application context for the Coffer CLI.
//!
//! Bundles the parsed arguments with the lazily loaded config file and
//! knows how to open the vault and log a user in.

use std::io::IsTerminal;
use std::path::PathBuf;

use coffer_core::{CofferConfig, Session, Vault};
use once_cell::unsync::OnceCell;

use crate::cli::Cli;
use crate::config::CliConfig;
use crate::errors::CliError;
use crate::ui::{ListFormat, UiContext};

use super::credentials::{key_passphrase, read_password};
use super::resolver::{load_config, missing_vault_hint, missing_vault_message, resolve_vault_root};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<CliConfig>>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    pub fn cli(&self) -> &Cli {
        self.cli
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether prompts can be shown.
    pub fn interactive(&self) -> bool {
        std::io::stdin().is_terminal()
    }

    /// UI context for a command's output flags.
    pub fn ui_context(&self, json: bool, format: Option<ListFormat>) -> UiContext {
        UiContext::from_env(json, format, self.cli.no_color, self.cli.ascii)
    }

    /// The config file, loaded once; `None` when it does not exist.
    pub fn config(&self) -> anyhow::Result<Option<&CliConfig>> {
        Ok(self.config.get_or_try_init(load_config)?.as_ref())
    }

    pub fn vault_root(&self) -> anyhow::Result<PathBuf> {
        resolve_vault_root(self.cli, self.config()?)
    }

    /// Open the existing vault, applying COFFER_KEY_PASSPHRASE if set.
    pub fn open_vault(&self) -> anyhow::Result<Vault> {
        let root = self.vault_root()?;
        if !root.is_dir() {
            return Err(
                CliError::not_found(missing_vault_message(&root), missing_vault_hint()).into(),
            );
        }
        self.open_vault_at(root)
    }

    /// Open (creating if needed) the vault rooted at `root`.
    pub fn open_vault_at(&self, root: PathBuf) -> anyhow::Result<Vault> {
        let vault = Vault::open(CofferConfig::new(root))?;
        match key_passphrase() {
            Some(passphrase) => Ok(vault.with_key_passphrase(passphrase)?),
            None => Ok(vault),
        }
    }

    /// Log in as `--user` / COFFER_USER.
    pub fn login(&self, vault: &Vault) -> anyhow::Result<Session> {
        let username = self
            .cli
            .user
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                CliError::auth_failed_with_hint(
                    "No user given",
                    "Hint: Pass --user or set COFFER_USER.",
                )
            })?;
        let password = read_password(username, self.interactive())?;
        Ok(vault.login(username, &password)?)
    }
}
