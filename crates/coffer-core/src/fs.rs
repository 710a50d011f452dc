//! Filesystem utilities for atomic artifact writes.
//!
//! Every artifact the vault persists goes through [`write_atomic`]: the bytes
//! land in a temp file next to the destination, are synced, and only then
//! renamed into place. Readers never observe a half-written file.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{CofferError, Result};

/// File permission policy for a written artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Default permissions (umask applies)
    Shared,
    /// Owner read/write only on Unix
    Private,
}

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// This function handles that case by removing the destination first and retrying.
///
/// If the rename ultimately fails, the temp file is cleaned up.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        // Best-effort replace on platforms where rename fails if target exists.
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Write `data` to `path` through a synced temp file and an atomic rename.
///
/// The parent directory is created when missing. Any existing file at `path`
/// is replaced.
pub fn write_atomic(path: &Path, data: &[u8], visibility: Visibility) -> Result<()> {
    let temp_path = prepare_temp(path)?;
    let outcome = write_synced(&temp_path, data, visibility)
        .and_then(|()| rename_with_fallback(&temp_path, path));
    if let Err(err) = outcome {
        let _ = fs::remove_file(&temp_path);
        return Err(CofferError::Io { source: err });
    }
    Ok(())
}

/// Like [`write_atomic`], but never replaces an existing destination.
///
/// The synced temp file is published with a hard link, which fails when
/// `path` exists, so of several concurrent writers exactly one wins.
/// Returns `Ok(false)` and leaves `path` untouched when it already exists.
pub fn write_atomic_new(path: &Path, data: &[u8], visibility: Visibility) -> Result<bool> {
    let temp_path = prepare_temp(path)?;
    let linked = write_synced(&temp_path, data, visibility)
        .and_then(|()| fs::hard_link(&temp_path, path));
    let _ = fs::remove_file(&temp_path);
    match linked {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(err) => Err(CofferError::Io { source: err }),
    }
}

/// Create the destination's parent and pick a fresh temp path beside it.
fn prepare_temp(path: &Path) -> Result<PathBuf> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;
    temp_path_for(&parent, path)
}

fn temp_path_for(parent: &Path, path: &Path) -> Result<PathBuf> {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| CofferError::Io {
            source: io::Error::other(format!("System time error: {}", e)),
        })?
        .as_nanos();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CofferError::InvalidInput(format!("Invalid filename: {}", path.display())))?;
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    Ok(parent.join(format!(
        ".{}.{}.{}.{}.tmp",
        filename,
        std::process::id(),
        nanos,
        seq
    )))
}

fn write_synced(temp_path: &Path, data: &[u8], visibility: Visibility) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    if visibility == Visibility::Private {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    #[cfg(not(unix))]
    let _ = visibility;

    let mut file = options.open(temp_path)?;
    file.write_all(data)?;
    file.sync_all()
}
