//! Read/write import graph snapshots from disk.

use crate::graph::ImportGraph;
use crate::schema;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load an import graph snapshot.
pub fn load(path: &Path) -> Result<ImportGraph> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read import graph from {}", path.display()))?;
    schema::from_json(&json).with_context(|| format!("invalid snapshot {}", path.display()))
}

/// Save an import graph snapshot, creating parent directories if needed.
pub fn save(path: &Path, graph: &ImportGraph) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let json = schema::to_json(graph)?;
    fs::write(path, json)
        .with_context(|| format!("failed to write import graph to {}", path.display()))?;

    Ok(())
}
