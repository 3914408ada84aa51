//! Advisory Lock
//!
//! Exclusive `flock` on a lock file, held for one orchestration call. Only
//! cooperating processes that take the same lock are serialised; the kernel
//! table itself stays shared.

use crate::domain::FirewallError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path-based advisory lock.
#[derive(Clone, Debug)]
pub struct AdvisoryLock {
    path: PathBuf,
}

/// Held lock; released on drop.
#[derive(Debug)]
pub struct AdvisoryLockGuard {
    file: File,
    path: PathBuf,
}

impl AdvisoryLock {
    /// Lock on `path`. The file is created on first acquisition.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Lock file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the lock is held.
    pub fn acquire(&self) -> Result<AdvisoryLockGuard, FirewallError> {
        let file = self.open()?;
        file.lock_exclusive().map_err(|source| self.error(source))?;
        debug!("[schain-fw] acquired lock {}", self.path.display());
        Ok(AdvisoryLockGuard {
            file,
            path: self.path.clone(),
        })
    }

    /// Take the lock if nobody holds it.
    pub fn try_acquire(&self) -> Result<Option<AdvisoryLockGuard>, FirewallError> {
        let file = self.open()?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(AdvisoryLockGuard {
                file,
                path: self.path.clone(),
            })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(source) => Err(self.error(source)),
        }
    }

    fn open(&self) -> Result<File, FirewallError> {
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.path)
            .map_err(|source| self.error(source))
    }

    fn error(&self, source: std::io::Error) -> FirewallError {
        FirewallError::Lock {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl Drop for AdvisoryLockGuard {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            debug!("[schain-fw] failed to unlock {}: {}", self.path.display(), e);
        }
    }
}
