//! Scoped change of the process working directory
//!
//! The working directory is process-global, so every guard holds one shared
//! lock for its whole lifetime. Two directory-sensitive executions can never
//! overlap, and the previous directory is restored on every exit path.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use crate::error::Result;

static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Restores the previous working directory and releases the lock on drop
#[derive(Debug)]
pub struct WorkdirGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkdirGuard {
    /// Take the working-directory lock and move into `dir`
    pub fn enter(dir: &Path) -> Result<Self> {
        // A panic while holding the lock still restored the directory in Drop
        let lock = CWD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::env::current_dir()?;

        debug!("Changing directory: {} -> {}", previous.display(), dir.display());
        std::env::set_current_dir(dir)?;

        Ok(Self {
            previous,
            _lock: lock,
        })
    }

    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        debug!("Restoring directory: {}", self.previous.display());
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            error!(
                "Failed to restore working directory {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}
