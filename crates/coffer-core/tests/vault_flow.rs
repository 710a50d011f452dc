use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use coffer_core::{CofferConfig, CofferError, Role, Session, Vault};
use secrecy::SecretString;
use tempfile::TempDir;

/// A vault in its own temp directory, with an admin and a user registered.
struct Fixture {
    dir: TempDir,
    vault: Vault,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let vault = Vault::open(CofferConfig::new(dir.path().join("vault")))
            .expect("vault should open");
        vault
            .register("root", "admin-password", "admin")
            .expect("admin registration should succeed");
        vault
            .register("alice", "user-password", "user")
            .expect("user registration should succeed");
        Self { dir, vault }
    }

    /// Same as `new`, plus the shared key pair installed.
    fn with_keys() -> Self {
        let fixture = Self::new();
        let (public_pem, private_pem) = shared_key_files();
        let config = fixture.vault.config();
        fs::write(config.public_key_path(), public_pem).expect("write public key");
        fs::write(config.private_key_path(), private_pem).expect("write private key");
        fixture
    }

    fn admin(&self) -> Session {
        self.vault
            .login("root", "admin-password")
            .expect("admin login should succeed")
    }

    fn user(&self) -> Session {
        self.vault
            .login("alice", "user-password")
            .expect("user login should succeed")
    }

    fn write_source(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("write source");
        path
    }

    fn out(&self, name: &str) -> PathBuf {
        self.dir.path().join("restored").join(name)
    }

    fn ciphertext_path(&self, name: &str) -> PathBuf {
        self.vault
            .config()
            .backups_dir()
            .join(format!("{}.bin", name))
    }

    fn metadata_path(&self, name: &str) -> PathBuf {
        self.vault
            .config()
            .backups_dir()
            .join(format!("{}.json", name))
    }
}

/// RSA generation is the slow step; generate one pair through the public API
/// and reuse its files across tests.
fn shared_key_files() -> &'static (String, String) {
    static KEYS: OnceLock<(String, String)> = OnceLock::new();
    KEYS.get_or_init(|| {
        let fixture = Fixture::new();
        let info = fixture
            .vault
            .generate_key_pair(&fixture.admin())
            .expect("key generation should succeed");
        (
            fs::read_to_string(&info.public_key_path).expect("read public key"),
            fs::read_to_string(&info.private_key_path).expect("read private key"),
        )
    })
}

fn restore_bytes(fixture: &Fixture, name: &str) -> Vec<u8> {
    let output = fixture.out(name);
    fixture
        .vault
        .restore_backup(&fixture.admin(), name, &output)
        .expect("restore should succeed");
    fs::read(output).expect("read restored file")
}

#[test]
fn test_round_trip_reproduces_bytes() {
    let fixture = Fixture::with_keys();
    let user = fixture.user();

    let large: Vec<u8> = (0..1024 * 1024).map(|i| (i % 251) as u8).collect();
    let cases: Vec<(&str, Vec<u8>)> = vec![
        ("empty.txt", Vec::new()),
        ("text.txt", b"quarterly report: all good\n".to_vec()),
        ("binary.dat", (0u8..=255).collect()),
        ("large.bin", large),
    ];

    for (file_name, contents) in cases {
        let source = fixture.write_source(file_name, &contents);
        let info = fixture
            .vault
            .create_backup(&user, &source)
            .expect("backup should succeed");
        assert_eq!(info.original_file_name, file_name);
        assert_eq!(info.size, Some(contents.len() as u64));

        assert_eq!(restore_bytes(&fixture, info.name.as_str()), contents);
    }
}

#[test]
fn test_ciphertext_does_not_contain_plaintext() {
    let fixture = Fixture::with_keys();
    let source = fixture.write_source("secret.txt", b"marker: PLAINTEXT_MARKER_123");

    let info = fixture
        .vault
        .create_backup(&fixture.user(), &source)
        .expect("backup should succeed");

    let on_disk = fs::read(fixture.ciphertext_path(info.name.as_str())).expect("read ciphertext");
    assert!(!String::from_utf8_lossy(&on_disk).contains("PLAINTEXT_MARKER_123"));
    let sidecar = fs::read_to_string(fixture.metadata_path(info.name.as_str())).expect("read sidecar");
    assert!(!sidecar.contains("PLAINTEXT_MARKER_123"));
    assert!(sidecar.contains("\"original_file\": \"secret.txt\""));
    assert!(sidecar.contains("\"encrypted_key\""));
}

#[test]
fn test_every_ciphertext_byte_flip_is_detected() {
    let fixture = Fixture::with_keys();
    let source = fixture.write_source("small.txt", b"0123456789abcdef");
    let info = fixture
        .vault
        .create_backup(&fixture.user(), &source)
        .expect("backup should succeed");
    let name = info.name.as_str();
    let path = fixture.ciphertext_path(name);
    let pristine = fs::read(&path).expect("read ciphertext");
    let admin = fixture.admin();
    let output = fixture.out("tampered.txt");

    for i in 0..pristine.len() {
        let mut tampered = pristine.clone();
        tampered[i] ^= 0x01;
        fs::write(&path, &tampered).expect("write tampered ciphertext");

        let err = fixture
            .vault
            .restore_backup(&admin, name, &output)
            .expect_err("tampered restore must fail");
        assert!(
            matches!(err, CofferError::IntegrityFailure(_)),
            "byte {}: unexpected {:?}",
            i,
            err
        );
        assert!(!output.exists(), "byte {}: plaintext was written", i);
    }

    fs::write(&path, &pristine).expect("restore pristine ciphertext");
    assert_eq!(restore_bytes(&fixture, name), b"0123456789abcdef");
}

#[test]
fn test_tampered_wrapped_key_is_integrity_failure() {
    let fixture = Fixture::with_keys();
    let source = fixture.write_source("doc.txt", b"contents");
    let info = fixture
        .vault
        .create_backup(&fixture.user(), &source)
        .expect("backup should succeed");

    let sidecar_path = fixture.metadata_path(info.name.as_str());
    let mut sidecar: serde_json::Value =
        serde_json::from_slice(&fs::read(&sidecar_path).expect("read sidecar")).expect("parse");
    let wrapped = sidecar["encrypted_key"].as_str().expect("key").to_string();
    let replacement = if wrapped.starts_with('A') { "B" } else { "A" };
    sidecar["encrypted_key"] = serde_json::Value::String(format!("{}{}", replacement, &wrapped[1..]));
    fs::write(&sidecar_path, serde_json::to_vec(&sidecar).expect("json")).expect("write sidecar");

    let err = fixture
        .vault
        .restore_backup(&fixture.admin(), info.name.as_str(), &fixture.out("doc.txt"))
        .expect_err("restore must fail");
    assert!(matches!(err, CofferError::IntegrityFailure(_)));
}

#[test]
fn test_authentication_properties() {
    let fixture = Fixture::new();
    let vault = &fixture.vault;

    assert!(vault.authenticate("alice", "user-password").unwrap());
    assert!(!vault.authenticate("alice", "").unwrap());
    assert!(!vault.authenticate("alice", "user-passwore").unwrap());
    assert!(!vault.authenticate("alice", "User-password").unwrap());
    assert!(!vault.authenticate("alice", "admin-password").unwrap());
    assert!(!vault.authenticate("nobody", "user-password").unwrap());

    assert!(matches!(
        vault.login("alice", "wrong"),
        Err(CofferError::AuthenticationFailed)
    ));
    assert!(matches!(
        vault.login("nobody", "wrong"),
        Err(CofferError::AuthenticationFailed)
    ));

    let session = vault.login("alice", "user-password").unwrap();
    assert_eq!(session.username(), "alice");
    assert_eq!(session.role(), Role::User);
    session.logout();
}

#[test]
fn test_duplicate_registration_keeps_original() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Vault::open(CofferConfig::new(dir.path())).unwrap();

    vault.register("alice", "pw1", "user").unwrap();
    let err = vault.register("alice", "pw2", "admin").unwrap_err();
    assert!(matches!(err, CofferError::DuplicateUser(_)));

    assert_eq!(vault.get_role("alice").unwrap(), Some(Role::User));
    assert!(vault.authenticate("alice", "pw1").unwrap());
    assert!(!vault.authenticate("alice", "pw2").unwrap());
    assert_eq!(vault.get_role("bob").unwrap(), None);
}

#[test]
fn test_invalid_role_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let vault = Vault::open(CofferConfig::new(dir.path())).unwrap();

    assert!(matches!(
        vault.register("eve", "pw", "owner"),
        Err(CofferError::InvalidRole(_))
    ));
    assert_eq!(vault.register("eve", "pw", "Admin").unwrap(), Role::Admin);
}

#[test]
fn test_non_admin_is_always_unauthorized() {
    let fixture = Fixture::new();
    let user = fixture.user();

    // No keys yet: authorization is still checked first.
    assert!(matches!(
        fixture.vault.generate_key_pair(&user),
        Err(CofferError::Unauthorized { .. })
    ));
    assert!(matches!(
        fixture
            .vault
            .restore_backup(&user, "anything", &fixture.out("x")),
        Err(CofferError::Unauthorized { .. })
    ));

    let fixture = Fixture::with_keys();
    let user = fixture.user();
    let source = fixture.write_source("mine.txt", b"mine");
    let info = fixture.vault.create_backup(&user, &source).unwrap();

    assert!(matches!(
        fixture
            .vault
            .restore_backup(&user, info.name.as_str(), &fixture.out("mine.txt")),
        Err(CofferError::Unauthorized { .. })
    ));
    assert!(matches!(
        fixture.vault.generate_key_pair(&user),
        Err(CofferError::Unauthorized { .. })
    ));
    assert!(!fixture.out("mine.txt").exists());
}

#[test]
fn test_missing_prerequisites() {
    let fixture = Fixture::new();
    let source = fixture.write_source("early.txt", b"too early");

    assert!(matches!(
        fixture.vault.create_backup(&fixture.user(), &source),
        Err(CofferError::MissingKeyPair)
    ));
    assert!(matches!(
        fixture
            .vault
            .restore_backup(&fixture.admin(), "backup_file", &fixture.out("early.txt")),
        Err(CofferError::MissingPrivateKey)
    ));
    assert!(fixture.vault.list_backups().unwrap().is_empty());
}

#[test]
fn test_source_and_backup_not_found() {
    let fixture = Fixture::with_keys();

    let missing = fixture.dir.path().join("missing.txt");
    assert!(matches!(
        fixture.vault.create_backup(&fixture.user(), &missing),
        Err(CofferError::SourceNotFound(ref p)) if p == &missing
    ));
    assert!(matches!(
        fixture
            .vault
            .restore_backup(&fixture.admin(), "nope", &fixture.out("nope")),
        Err(CofferError::BackupNotFound(_))
    ));
    assert!(matches!(
        fixture
            .vault
            .restore_backup(&fixture.admin(), "../../etc/passwd", &fixture.out("nope")),
        Err(CofferError::BackupNotFound(_))
    ));
}

#[test]
fn test_missing_ciphertext_is_backup_not_found() {
    let fixture = Fixture::with_keys();
    let source = fixture.write_source("a.txt", b"a");
    let info = fixture.vault.create_backup(&fixture.user(), &source).unwrap();
    fs::remove_file(fixture.ciphertext_path(info.name.as_str())).unwrap();

    assert!(matches!(
        fixture
            .vault
            .restore_backup(&fixture.admin(), info.name.as_str(), &fixture.out("a.txt")),
        Err(CofferError::BackupNotFound(_))
    ));
}

#[test]
fn test_repeated_backups_never_overwrite() {
    let fixture = Fixture::with_keys();
    let user = fixture.user();
    let source = fixture.write_source("notes.txt", b"version one");
    let first = fixture.vault.create_backup(&user, &source).unwrap();

    fs::write(&source, b"version two").unwrap();
    let second = fixture.vault.create_backup(&user, &source).unwrap();

    assert_ne!(first.name, second.name);
    assert_eq!(restore_bytes(&fixture, first.name.as_str()), b"version one");
    assert_eq!(restore_bytes(&fixture, second.name.as_str()), b"version two");
    assert_eq!(
        fixture.vault.list_backups().unwrap(),
        vec![first.name, second.name]
    );
}

#[test]
fn test_back_to_back_backups_list_in_creation_order() {
    let fixture = Fixture::with_keys();
    let user = fixture.user();
    let source = fixture.write_source("tiny.txt", b"x");

    let created: Vec<_> = (0..50)
        .map(|_| fixture.vault.create_backup(&user, &source).unwrap().name)
        .collect();

    assert_eq!(fixture.vault.list_backups().unwrap(), created);
}

#[test]
fn test_concurrent_same_name_backups_have_one_winner() {
    let fixture = Fixture::with_keys();
    let user = fixture.user();
    let sources = [
        fixture.write_source("left.bin", &vec![b'L'; 1024 * 1024]),
        fixture.write_source("right.bin", &vec![b'R'; 1024 * 1024]),
    ];

    for round in 0..10 {
        let name = format!("contended-{}", round);
        let barrier = std::sync::Barrier::new(sources.len());
        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|source| {
                    let (vault, user, name, barrier) = (&fixture.vault, &user, &name, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        vault.create_backup_named(user, source, name)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1, "round {}", round);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(CofferError::DuplicateBackup(n)) if *n == name)));

        let expected = if winners[0].original_file_name == "left.bin" {
            b'L'
        } else {
            b'R'
        };
        let restored = restore_bytes(&fixture, &name);
        assert!(restored.iter().all(|&b| b == expected));
    }
}

#[test]
fn test_catalog_lists_exactly_created_names() {
    let fixture = Fixture::with_keys();
    let user = fixture.user();
    let source = fixture.write_source("data.txt", b"data");

    fixture
        .vault
        .create_backup_named(&user, &source, "B")
        .unwrap();
    fixture
        .vault
        .create_backup_named(&user, &source, "A")
        .unwrap();

    let names: Vec<String> = fixture
        .vault
        .list_backups()
        .unwrap()
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(names, vec!["A", "B"]);

    let details = fixture.vault.backup_details().unwrap();
    assert_eq!(details.len(), 2);
    assert!(details.iter().all(|d| d.original_file_name == "data.txt"));
    assert_eq!(fixture.vault.backup_info("A").unwrap().size, Some(4));
}

#[test]
fn test_named_backup_conflicts_and_validation() {
    let fixture = Fixture::with_keys();
    let user = fixture.user();
    let source = fixture.write_source("data.txt", b"data");

    fixture
        .vault
        .create_backup_named(&user, &source, "weekly")
        .unwrap();
    assert!(matches!(
        fixture.vault.create_backup_named(&user, &source, "weekly"),
        Err(CofferError::DuplicateBackup(_))
    ));
    assert!(matches!(
        fixture.vault.create_backup_named(&user, &source, "../escape"),
        Err(CofferError::InvalidInput(_))
    ));
    assert_eq!(fixture.vault.list_backups().unwrap().len(), 1);
}

#[test]
fn test_restore_overwrites_existing_output() {
    let fixture = Fixture::with_keys();
    let source = fixture.write_source("report.txt", b"fresh contents");
    let info = fixture
        .vault
        .create_backup(&fixture.user(), &source)
        .unwrap();

    let output = fixture.out("report.txt");
    fs::create_dir_all(output.parent().unwrap()).unwrap();
    fs::write(&output, b"stale contents that are longer").unwrap();

    let report = fixture
        .vault
        .restore_backup(&fixture.admin(), info.name.as_str(), &output)
        .unwrap();
    assert_eq!(report.original_file_name, "report.txt");
    assert_eq!(report.bytes_written, 14);
    assert_eq!(fs::read(&output).unwrap(), b"fresh contents");
}

#[test]
fn test_regenerated_keys_cannot_open_old_backups() {
    let fixture = Fixture::with_keys();
    let source = fixture.write_source("old.txt", b"old");
    let info = fixture
        .vault
        .create_backup(&fixture.user(), &source)
        .unwrap();

    fixture.vault.generate_key_pair(&fixture.admin()).unwrap();

    let err = fixture
        .vault
        .restore_backup(&fixture.admin(), info.name.as_str(), &fixture.out("old.txt"))
        .unwrap_err();
    assert!(err.is_integrity_failure());
}

#[test]
fn test_sealed_private_key() {
    let fixture = Fixture::new();
    let root = fixture.vault.config().root().to_path_buf();
    let passphrase = || SecretString::from("key-passphrase-123".to_string());

    let sealed_vault = Vault::open(CofferConfig::new(&root))
        .unwrap()
        .with_key_passphrase(passphrase())
        .unwrap();
    let admin = sealed_vault.login("root", "admin-password").unwrap();
    let info = sealed_vault.generate_key_pair(&admin).unwrap();
    assert!(info.sealed);
    assert!(sealed_vault.key_status().unwrap().private_key_sealed);

    let private_raw = fs::read(&info.private_key_path).unwrap();
    assert!(!String::from_utf8_lossy(&private_raw).contains("PRIVATE KEY"));

    let source = fixture.write_source("sealed.txt", b"behind a passphrase");
    let backup = sealed_vault
        .create_backup(&sealed_vault.login("alice", "user-password").unwrap(), &source)
        .unwrap();

    // The unsealed vault handle can still back up, but cannot restore.
    assert!(matches!(
        fixture.vault.restore_backup(
            &fixture.admin(),
            backup.name.as_str(),
            &fixture.out("sealed.txt")
        ),
        Err(CofferError::PrivateKeyLocked)
    ));

    let wrong = Vault::open(CofferConfig::new(&root))
        .unwrap()
        .with_key_passphrase(SecretString::from("not-the-passphrase".to_string()))
        .unwrap();
    assert!(matches!(
        wrong.restore_backup(&admin, backup.name.as_str(), &fixture.out("sealed.txt")),
        Err(CofferError::IncorrectPassphrase)
    ));

    let output = fixture.out("sealed.txt");
    sealed_vault
        .restore_backup(&admin, backup.name.as_str(), &output)
        .unwrap();
    assert_eq!(fs::read(output).unwrap(), b"behind a passphrase");
}

#[test]
fn test_short_key_passphrase_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let result = Vault::open(CofferConfig::new(dir.path()))
        .unwrap()
        .with_key_passphrase(SecretString::from("short".to_string()));
    assert!(matches!(result, Err(CofferError::InvalidInput(_))));
}

#[test]
fn test_vault_root_layout() {
    let fixture = Fixture::with_keys();
    let root: &Path = fixture.vault.config().root();
    let source = fixture.write_source("f.txt", b"f");
    let info = fixture
        .vault
        .create_backup(&fixture.user(), &source)
        .unwrap();

    assert!(root.join("users.json").is_file());
    assert!(root.join("public.pem").is_file());
    assert!(root.join("private.pem").is_file());
    assert!(root
        .join("backups")
        .join(format!("{}.bin", info.name))
        .is_file());
    assert!(root
        .join("backups")
        .join(format!("{}.json", info.name))
        .is_file());
}
