//! The vault facade used by presentation layers.
//!
//! `Vault` owns the credential store, key-pair manager and backup catalog
//! for one root directory. Operations that need authorization take a
//! [`Session`] obtained from [`Vault::login`].

use std::fs;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::accounts::{CredentialStore, Role};
use crate::backup::{
    BackupCatalog, BackupEngine, BackupId, BackupInfo, RestoreEngine, RestoreReport,
};
use crate::config::CofferConfig;
use crate::crypto::validate_key_passphrase;
use crate::error::{CofferError, Result};
use crate::keys::{KeyPairInfo, KeyPairManager, KeyPairStatus};
use crate::session::Session;

pub struct Vault {
    config: CofferConfig,
    accounts: CredentialStore,
    keys: KeyPairManager,
    catalog: BackupCatalog,
}

impl Vault {
    /// Open (or initialize) the vault rooted at `config.root`.
    pub fn open(config: CofferConfig) -> Result<Self> {
        fs::create_dir_all(config.root())?;
        tracing::debug!(root = %config.root().display(), "opened vault");
        Ok(Self {
            accounts: CredentialStore::new(config.accounts_path()),
            keys: KeyPairManager::from_config(&config),
            catalog: BackupCatalog::new(config.backups_dir()),
            config,
        })
    }

    /// Seal generated private keys with `passphrase` and use it to open
    /// sealed ones.
    pub fn with_key_passphrase(mut self, passphrase: SecretString) -> Result<Self> {
        validate_key_passphrase(passphrase.expose_secret())?;
        self.keys.set_passphrase(passphrase);
        Ok(self)
    }

    pub fn config(&self) -> &CofferConfig {
        &self.config
    }

    // --- Credential store ---

    pub fn register(&self, username: &str, password: &str, role: &str) -> Result<Role> {
        self.accounts.register(username, password, role)
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        self.accounts.authenticate(username, password)
    }

    pub fn get_role(&self, username: &str) -> Result<Option<Role>> {
        self.accounts.get_role(username)
    }

    /// Registered usernames in sorted order.
    pub fn usernames(&self) -> Result<Vec<String>> {
        self.accounts.usernames()
    }

    /// Authenticate and open a session.
    ///
    /// Fails with `AuthenticationFailed` for unknown users and wrong
    /// passwords alike.
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        if !self.accounts.authenticate(username, password)? {
            return Err(CofferError::AuthenticationFailed);
        }
        let role = self
            .accounts
            .get_role(username)?
            .ok_or(CofferError::AuthenticationFailed)?;
        tracing::info!(username, role = %role, "logged in");
        Ok(Session::new(username, role))
    }

    // --- Key pair ---

    pub fn generate_key_pair(&self, session: &Session) -> Result<KeyPairInfo> {
        self.keys.generate(session)
    }

    pub fn key_status(&self) -> Result<KeyPairStatus> {
        self.keys.status()
    }

    // --- Backups ---

    /// Encrypt `source` into a new, uniquely named backup unit.
    pub fn create_backup(&self, session: &Session, source: &Path) -> Result<BackupInfo> {
        tracing::debug!(
            username = %session.username(),
            source = %source.display(),
            "backup requested"
        );
        self.engine().create_backup(source)
    }

    /// Encrypt `source` into a backup unit called `name`.
    pub fn create_backup_named(
        &self,
        session: &Session,
        source: &Path,
        name: &str,
    ) -> Result<BackupInfo> {
        let id: BackupId = name.parse()?;
        tracing::debug!(
            username = %session.username(),
            source = %source.display(),
            backup = %id,
            "backup requested"
        );
        self.engine().create_backup_named(source, &id)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupId>> {
        self.catalog.list()
    }

    pub fn backup_details(&self) -> Result<Vec<BackupInfo>> {
        self.catalog.details()
    }

    pub fn backup_info(&self, name: &str) -> Result<BackupInfo> {
        let id: BackupId = name
            .parse()
            .map_err(|_| CofferError::BackupNotFound(name.to_string()))?;
        self.catalog.info(&id)
    }

    pub fn restore_backup(
        &self,
        session: &Session,
        name: &str,
        output: &Path,
    ) -> Result<RestoreReport> {
        RestoreEngine::new(&self.keys, &self.catalog).restore_backup(session, name, output)
    }

    fn engine(&self) -> BackupEngine<'_> {
        BackupEngine::new(&self.keys, self.catalog.backups_dir())
    }
}
