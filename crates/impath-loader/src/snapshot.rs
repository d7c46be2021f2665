//! Loading a graph saved with `--save-graph`.

use crate::{GraphLoader, LoadError};
use impath_core::graph::ImportGraph;
use std::path::PathBuf;

/// A JSON snapshot on disk.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    pub path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GraphLoader for SnapshotFile {
    fn load(&self) -> Result<ImportGraph, LoadError> {
        impath_core::storage::load(&self.path).map_err(LoadError::Snapshot)
    }

    fn describe(&self) -> String {
        format!("snapshot {}", self.path.display())
    }
}
