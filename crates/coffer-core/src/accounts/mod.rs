//! Credential store: per-user salt, derived key and role.
//!
//! The account table is a JSON object persisted at a single path and
//! rewritten wholesale (atomically) on every registration. Accounts are
//! immutable once created.

mod types;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::crypto::kdf::{derive_key, generate_salt};
use crate::crypto::{validate_password, validate_username};
use crate::error::{CofferError, Result};
use crate::fs::{write_atomic, Visibility};

pub use types::{AccountRecord, AccountTable, Role};

/// File-backed account table.
pub struct CredentialStore {
    path: PathBuf,
    // Serializes read-modify-write of the table within this process.
    lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the username or password is unusable
    /// - `DuplicateUser` if the username is taken (the existing account is untouched)
    /// - `InvalidRole` if `role` is not `admin` or `user`
    pub fn register(&self, username: &str, password: &str, role: &str) -> Result<Role> {
        validate_username(username)?;

        let _guard = self.lock()?;
        let mut table = self.load()?;

        if table.contains_key(username) {
            return Err(CofferError::DuplicateUser(username.to_string()));
        }
        let role: Role = role.parse()?;
        validate_password(password)?;

        let salt = generate_salt();
        let key = derive_key(password, &salt);

        table.insert(
            username.to_string(),
            AccountRecord {
                salt: STANDARD.encode(salt),
                derived_key: STANDARD.encode(key.as_bytes()),
                role,
            },
        );
        self.save(&table)?;

        tracing::info!(username, role = %role, "registered account");
        Ok(role)
    }

    /// Verify a password against the stored derived key.
    ///
    /// Returns `Ok(false)` for unknown users and wrong passwords alike.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<bool> {
        let record = {
            let _guard = self.lock()?;
            self.load()?.remove(username)
        };
        let Some(record) = record else {
            tracing::warn!(username, "authentication failed: unknown user");
            return Ok(false);
        };

        let salt = self.decode_field(username, "salt", &record.salt)?;
        let stored = self.decode_field(username, "key", &record.derived_key)?;

        let verified = derive_key(password, &salt).matches(&stored);
        if verified {
            tracing::debug!(username, "authenticated");
        } else {
            tracing::warn!(username, "authentication failed: wrong password");
        }
        Ok(verified)
    }

    /// Look up the role of an account.
    pub fn get_role(&self, username: &str) -> Result<Option<Role>> {
        let _guard = self.lock()?;
        Ok(self.load()?.get(username).map(|record| record.role))
    }

    /// Registered usernames in sorted order.
    pub fn usernames(&self) -> Result<Vec<String>> {
        let _guard = self.lock()?;
        Ok(self.load()?.into_keys().collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| CofferError::Io {
            source: io::Error::other("account table lock poisoned"),
        })
    }

    fn load(&self) -> Result<AccountTable> {
        let contents = match fs::read(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(AccountTable::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&contents).map_err(|e| CofferError::corrupt(&self.path, e))
    }

    fn save(&self, table: &AccountTable) -> Result<()> {
        let contents = serde_json::to_vec_pretty(table)?;
        write_atomic(&self.path, &contents, Visibility::Private)
    }

    fn decode_field(&self, username: &str, field: &str, value: &str) -> Result<Vec<u8>> {
        STANDARD.decode(value).map_err(|e| {
            CofferError::corrupt(
                &self.path,
                format!("account {} has invalid {}: {}", username, field, e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &Path) -> CredentialStore {
        CredentialStore::new(dir.join("users.json"))
    }

    #[test]
    fn test_register_and_authenticate() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        assert_eq!(store.register("alice", "pw1", "user").unwrap(), Role::User);
        assert!(store.authenticate("alice", "pw1").unwrap());
        assert!(!store.authenticate("alice", "pw2").unwrap());
        assert!(!store.authenticate("alice", "").unwrap());
        assert!(!store.authenticate("mallory", "pw1").unwrap());
    }

    #[test]
    fn test_duplicate_user_keeps_original_account() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.register("alice", "pw1", "user").unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = store.register("alice", "pw2", "admin").unwrap_err();
        assert!(matches!(err, CofferError::DuplicateUser(ref u) if u == "alice"));

        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert_eq!(store.get_role("alice").unwrap(), Some(Role::User));
        assert!(store.authenticate("alice", "pw1").unwrap());
        assert!(!store.authenticate("alice", "pw2").unwrap());
    }

    #[test]
    fn test_invalid_role_creates_nothing() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let err = store.register("bob", "pw", "root").unwrap_err();
        assert!(matches!(err, CofferError::InvalidRole(_)));
        assert_eq!(store.get_role("bob").unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_empty_password_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(matches!(
            store.register("carol", "", "user"),
            Err(CofferError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_table_on_disk_holds_no_password() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store
            .register("alice", "PLAINTEXT_MARKER_123", "admin")
            .unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(!raw.contains("PLAINTEXT_MARKER_123"));

        let table: AccountTable = serde_json::from_str(&raw).unwrap();
        let record = &table["alice"];
        assert_eq!(STANDARD.decode(&record.salt).unwrap().len(), 16);
        assert_eq!(STANDARD.decode(&record.derived_key).unwrap().len(), 32);
        assert_eq!(record.role, Role::Admin);
    }

    #[test]
    fn test_fresh_salt_per_account() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.register("alice", "same", "user").unwrap();
        store.register("bob", "same", "user").unwrap();

        let table: AccountTable =
            serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
        assert_ne!(table["alice"].salt, table["bob"].salt);
        assert_ne!(table["alice"].derived_key, table["bob"].derived_key);
        assert_eq!(store.usernames().unwrap(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_bit_flipped_password_fails() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        store.register("alice", "hunter2", "user").unwrap();

        let mut bytes = b"hunter2".to_vec();
        bytes[0] ^= 0x01;
        let flipped = String::from_utf8(bytes).unwrap();
        assert!(!store.authenticate("alice", &flipped).unwrap());
    }

    #[test]
    fn test_corrupt_table_is_reported() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), b"{not json").unwrap();

        assert!(matches!(
            store.get_role("alice"),
            Err(CofferError::CorruptRecord { .. })
        ));
        assert!(matches!(
            store.register("alice", "pw", "user"),
            Err(CofferError::CorruptRecord { .. })
        ));
    }
}
