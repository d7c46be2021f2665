//! Import graph from `go list -json -deps`.
//!
//! `go list` prints one JSON object per package, dependencies before their
//! importers. With `-test`, test variants appear as separate packages whose
//! `ImportPath` carries a bracketed suffix (`p [q.test]`); each becomes its
//! own graph node sharing the plain package's path.

use crate::{GraphLoader, LoadError};
use impath_core::graph::{ImportGraph, ImportGraphBuilder, PackageSpec};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::PathBuf;
use std::process::Command;

/// Fields requested from `go list -json=...`.
const JSON_FIELDS: &str = "ImportPath,Module,Imports,ImportMap,DepOnly,Error";

/// The cgo pseudo-import, which has no package of its own.
const CGO_PSEUDO_PACKAGE: &str = "C";

/// One package record as printed by `go list -json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoListPackage {
    pub import_path: String,
    #[serde(default)]
    pub module: Option<GoModule>,
    /// Resolved ids of imported packages.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Import path as written in source → resolved id, where they differ.
    #[serde(default)]
    pub import_map: BTreeMap<String, String>,
    /// Set for packages listed only as dependencies of the requested ones.
    #[serde(default)]
    pub dep_only: bool,
    #[serde(default)]
    pub error: Option<GoPackageError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoModule {
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GoPackageError {
    pub err: String,
}

/// Decode the concatenated JSON objects printed by `go list -json`.
pub fn decode<R: Read>(reader: R) -> Result<Vec<GoListPackage>, LoadError> {
    serde_json::Deserializer::from_reader(reader)
        .into_iter::<GoListPackage>()
        .map(|pkg| pkg.map_err(LoadError::from))
        .collect()
}

/// Assemble an [`ImportGraph`] from decoded `go list` records.
///
/// Roots are the packages not marked `DepOnly`, in output order. Edges are
/// named by the import path written in source, so a test variant's edge to
/// `p [q.test]` is still called `p`.
pub fn build_graph(packages: Vec<GoListPackage>) -> Result<ImportGraph, LoadError> {
    if let Some(broken) = packages.iter().find(|p| p.error.is_some()) {
        return Err(LoadError::Package {
            package: broken.import_path.clone(),
            message: broken
                .error
                .as_ref()
                .map(|e| e.err.trim().to_string())
                .unwrap_or_default(),
        });
    }

    let mut builder = ImportGraphBuilder::new();
    let mut roots = Vec::new();
    for pkg in packages {
        let written: HashMap<&str, &str> = pkg
            .import_map
            .iter()
            .map(|(src, resolved)| (resolved.as_str(), src.as_str()))
            .collect();

        let mut spec = PackageSpec::new(pkg.import_path.clone());
        if let Some(module) = &pkg.module {
            spec = spec.module(module.path.clone());
        }
        for import in &pkg.imports {
            if import == CGO_PSEUDO_PACKAGE {
                continue;
            }
            spec = match written.get(import.as_str()) {
                Some(name) => spec.import_as(*name, import.clone()),
                None => spec.import(import.clone()),
            };
        }

        if !pkg.dep_only {
            roots.push(pkg.import_path.clone());
        }
        builder.package(spec);
    }
    for root in roots {
        builder.root(root);
    }

    builder.build().map_err(LoadError::from)
}

/// Runs `go list` in a project directory.
#[derive(Debug, Clone)]
pub struct GoList {
    /// Go binary.
    pub go: String,
    /// Working directory for the command.
    pub dir: PathBuf,
    /// Include test packages (`-test`).
    pub tests: bool,
    /// Build tags (`-tags`).
    pub tags: Vec<String>,
    /// Package patterns; `.` when empty.
    pub patterns: Vec<String>,
}

impl GoList {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            go: "go".to_string(),
            dir: dir.into(),
            tests: true,
            tags: Vec::new(),
            patterns: Vec::new(),
        }
    }

    /// Arguments passed to the go binary.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "list".to_string(),
            format!("-json={}", JSON_FIELDS),
            "-deps".to_string(),
        ];
        if self.tests {
            args.push("-test".to_string());
        }
        if !self.tags.is_empty() {
            args.push("-tags".to_string());
            args.push(self.tags.join(","));
        }
        if self.patterns.is_empty() {
            args.push(".".to_string());
        } else {
            args.extend(self.patterns.iter().cloned());
        }
        args
    }

    fn command_line(&self) -> String {
        format!("{} {}", self.go, self.args().join(" "))
    }
}

impl GraphLoader for GoList {
    fn load(&self) -> Result<ImportGraph, LoadError> {
        tracing::debug!(dir = %self.dir.display(), command = %self.command_line(), "running go list");

        let output = Command::new(&self.go)
            .args(self.args())
            .current_dir(&self.dir)
            .output()
            .map_err(|source| LoadError::Spawn {
                program: self.go.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LoadError::Command {
                command: self.command_line(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let packages = decode(output.stdout.as_slice())?;
        tracing::info!(packages = packages.len(), "loaded package list");
        build_graph(packages)
    }

    fn describe(&self) -> String {
        self.command_line()
    }
}
