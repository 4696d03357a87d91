//! Input staging for interpreters that mutate, lock or delete their input

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use super::path_arg;
use crate::error::{Error, Result};

/// Copies inputs into a private scratch directory when staging is enabled.
///
/// The scratch directory is unique to this stager and is removed when the
/// stager is dropped. Inputs are staged through a [`StagingSession`], one
/// per command line; callers must serialize sessions that share a stager.
#[derive(Debug)]
pub struct InputStager {
    scratch: Option<TempDir>,
}

impl InputStager {
    /// A stager that passes paths through untouched
    pub fn passthrough() -> Self {
        Self { scratch: None }
    }

    /// A stager with its own freshly created scratch directory
    pub fn scratch() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("runtests-").tempdir()?;
        debug!("Created scratch directory {}", dir.path().display());
        Ok(Self { scratch: Some(dir) })
    }

    pub fn new(trashes_input: bool) -> Result<Self> {
        if trashes_input {
            Self::scratch()
        } else {
            Ok(Self::passthrough())
        }
    }

    pub fn is_staging(&self) -> bool {
        self.scratch.is_some()
    }

    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch.as_ref().map(TempDir::path)
    }

    /// Start staging the inputs of one command line
    pub fn session(&self) -> StagingSession<'_> {
        StagingSession {
            scratch: self.scratch_dir(),
            next_slot: 0,
        }
    }
}

/// Stages the inputs of a single command line.
///
/// Each input gets its own numbered slot, `<scratch>/<n>/<basename>`, so
/// inputs sharing a basename never overwrite each other while the same
/// sequence of inputs always lands on the same paths.
#[derive(Debug)]
pub struct StagingSession<'a> {
    scratch: Option<&'a Path>,
    next_slot: usize,
}

impl StagingSession<'_> {
    /// Return the path the interpreter should read `path` from
    pub fn stage(&mut self, path: &Path) -> Result<PathBuf> {
        let Some(scratch) = self.scratch else {
            return Ok(path.to_path_buf());
        };

        let staging_error = |source| Error::Staging {
            path: path.to_path_buf(),
            source,
        };

        let file_name = path.file_name().ok_or_else(|| {
            staging_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path has no file name",
            ))
        })?;

        let slot = scratch.join(self.next_slot.to_string());
        self.next_slot += 1;
        std::fs::create_dir_all(&slot).map_err(staging_error)?;

        let staged = slot.join(file_name);
        std::fs::copy(path, &staged).map_err(staging_error)?;

        debug!("Staged {} -> {}", path.display(), staged.display());
        Ok(staged)
    }

    /// [`StagingSession::stage`], rendered as a command-line argument
    pub fn stage_arg(&mut self, path: &Path) -> Result<String> {
        Ok(path_arg(&self.stage(path)?))
    }
}
