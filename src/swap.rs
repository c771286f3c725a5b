//! Safe in-place replacement: one-time backup, staged output file, atomic
//! promote.
//!
//! The run proceeds backup -> transform -> replace, each step a precondition
//! for the next. A failure while the staged file is being produced removes
//! it and leaves the original untouched; a failure during the final rename
//! leaves both files on disk for manual recovery.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::PrepError;

/// Copies `original` to `backup` byte-for-byte unless the backup already
/// exists. Returns whether a copy was made, so repeated runs never clobber
/// the first snapshot.
pub fn ensure_backup(original: &Path, backup: &Path) -> Result<bool, PrepError> {
    if backup.exists() {
        return Ok(false);
    }
    fs::copy(original, backup)?;
    Ok(true)
}

/// A staged replacement file, deleted on drop unless promoted.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replaces `destination` with the staged file.
    pub fn promote(mut self, destination: &Path) -> Result<(), PrepError> {
        // Disarm before the rename: if the rename itself fails, the staged
        // file must stay on disk alongside the original for manual recovery.
        self.armed = false;
        fs::rename(&self.path, destination)?;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = fs::remove_file(&self.path);
        }
    }
}
