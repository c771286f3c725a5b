//! Deterministic resolution of the crimes dataset file layout.
//!
//! The transform operates on a fixed extract under the project root and
//! keeps its backup and staging file as siblings of the source, so every
//! path here is a pure function of the root directory.

use std::path::{Path, PathBuf};

use crate::error::PrepError;

pub const DATA_DIR: &str = "test-data";
pub const SOURCE_FILE_NAME: &str = "Chicago_Crimes_2025_Enriched.csv";
pub const BACKUP_SUFFIX: &str = ".backup";
pub const STAGING_SUFFIX: &str = ".tmp";

#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub source: PathBuf,
    pub backup: PathBuf,
    pub staging: PathBuf,
}

/// Computes the source, backup, and staging paths for `root` without
/// touching the filesystem.
pub fn dataset_paths(root: &Path) -> DatasetPaths {
    let source = root.join(DATA_DIR).join(SOURCE_FILE_NAME);
    let backup = append_suffix(&source, BACKUP_SUFFIX);
    let staging = append_suffix(&source, STAGING_SUFFIX);
    DatasetPaths {
        source,
        backup,
        staging,
    }
}

/// Resolves the layout and verifies the source extract exists.
pub fn locate(root: &Path) -> Result<DatasetPaths, PrepError> {
    let paths = dataset_paths(root);
    if !paths.source.is_file() {
        return Err(PrepError::NotFound(paths.source));
    }
    Ok(paths)
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
