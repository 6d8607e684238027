//! Exclusive lock that keeps two decision cycles from acting at once.
//!
//! The lock is advisory (`fs2`, flock/LockFileEx) and released when the
//! guard drops, including when the process dies.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::LockError;

/// File name used under `~/.lightcycle` when no lock path is configured.
pub const DEFAULT_LOCK_FILE: &str = "cycle.lock";

/// Held exclusive lock. Unlocks on drop.
#[derive(Debug)]
pub struct CycleLock {
    file: File,
    path: PathBuf,
}

impl CycleLock {
    /// Take the lock without waiting.
    ///
    /// # Errors
    ///
    /// `LockError::Held` when another process holds it, `LockError::Io` when
    /// the file cannot be created or locked for any other reason.
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| LockError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| LockError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                file,
                path: path.to_path_buf(),
            }),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(LockError::Held(path.to_path_buf()))
            }
            Err(e) => Err(LockError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CycleLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// `~/.lightcycle/cycle.lock`.
///
/// # Errors
///
/// Fails when the home directory cannot be determined.
pub fn default_lock_path() -> Result<PathBuf, crate::domain::ConfigError> {
    let home = dirs::home_dir().ok_or(crate::domain::ConfigError::NoHomeDir)?;
    Ok(home.join(".lightcycle").join(DEFAULT_LOCK_FILE))
}
