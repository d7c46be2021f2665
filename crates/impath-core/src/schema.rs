//! JSON snapshot format and version handling for saved import graphs.

use crate::graph::{GraphError, ImportGraph, ImportGraphBuilder, PackageSpec, package_path};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CURRENT_VERSION: &str = "1.0.0";

/// On-disk form of an [`ImportGraph`]. Edges refer to packages by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub roots: Vec<String>,
    pub packages: Vec<PackageRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: String,
    /// Defaults to the id with any test-variant suffix removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Import name → target package id.
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
}

impl GraphSnapshot {
    pub fn from_graph(graph: &ImportGraph) -> Self {
        let packages = graph
            .iter()
            .map(|(_, pkg)| PackageRecord {
                id: pkg.id.clone(),
                path: (pkg.path != package_path(&pkg.id)).then(|| pkg.path.clone()),
                module: pkg.module.clone(),
                imports: pkg
                    .imports
                    .iter()
                    .map(|(name, &target)| (name.clone(), graph[target].id.clone()))
                    .collect(),
            })
            .collect();

        Self {
            version: CURRENT_VERSION.to_string(),
            created_at: Utc::now(),
            roots: graph.roots().iter().map(|&r| graph[r].id.clone()).collect(),
            packages,
        }
    }

    pub fn into_graph(self) -> Result<ImportGraph, GraphError> {
        let mut builder = ImportGraphBuilder::new();
        for record in self.packages {
            let mut spec = PackageSpec::new(record.id);
            if let Some(path) = record.path {
                spec.path = path;
            }
            spec.module = record.module;
            spec.imports = record.imports.into_iter().collect();
            builder.package(spec);
        }
        for root in self.roots {
            builder.root(root);
        }
        builder.build()
    }
}

/// Validate a snapshot's schema version.
pub fn validate_version(snapshot: &GraphSnapshot) -> Result<()> {
    if snapshot.version != CURRENT_VERSION {
        anyhow::bail!(
            "snapshot version mismatch: expected {}, found {}",
            CURRENT_VERSION,
            snapshot.version
        );
    }
    Ok(())
}

/// Serialize an import graph to a pretty-printed JSON snapshot.
pub fn to_json(graph: &ImportGraph) -> Result<String> {
    serde_json::to_string_pretty(&GraphSnapshot::from_graph(graph))
        .context("failed to serialize import graph to JSON")
}

/// Deserialize an import graph from a JSON snapshot.
pub fn from_json(json: &str) -> Result<ImportGraph> {
    let snapshot: GraphSnapshot =
        serde_json::from_str(json).context("failed to deserialize import graph from JSON")?;
    validate_version(&snapshot)?;
    snapshot
        .into_graph()
        .context("snapshot does not describe a consistent import graph")
}
