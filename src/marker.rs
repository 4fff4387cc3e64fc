//! Manual trigger marker.
//!
//! A single file whose existence means "run every manual task now".
//! Raising it creates the file; consuming it removes the file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// The manual trigger marker at a well-known path.
#[derive(Debug, Clone)]
pub struct ManualMarker {
    path: PathBuf,
}

impl ManualMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Request a manual run. Idempotent while the request is pending.
    pub fn raise(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::File::create(&self.path)?;
        Ok(())
    }

    /// Take the pending request, if any.
    ///
    /// Returns `true` exactly once per raise: the check and the removal
    /// are the same `remove_file` call.
    pub fn consume(&self) -> io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
