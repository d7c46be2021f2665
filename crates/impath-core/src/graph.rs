//! Import graph data model.
//!
//! Packages live in an arena and are addressed by [`NodeId`]. Identity is by
//! id, never by [`Package::path`]: a package and its test variant share a
//! path but are distinct nodes.

use std::collections::{BTreeMap, HashMap};

/// Index of a package inside an [`ImportGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One unit of the import graph (a Go package or one of its test variants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Loader-unique identifier, e.g. `example.com/a [example.com/a.test]`.
    pub id: String,
    /// Canonical package path. Patterns match against this.
    pub path: String,
    /// Owning module path, if the package belongs to a module.
    pub module: Option<String>,
    /// Outgoing edges keyed by import name. Sorted, so iteration order is
    /// the lexicographic edge order.
    pub imports: BTreeMap<String, NodeId>,
}

/// Errors raised while assembling an [`ImportGraph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate package id: {0}")]
    DuplicatePackage(String),
    #[error("package {from} imports unknown package {target}")]
    DanglingImport { from: String, target: String },
    #[error("unknown root package: {0}")]
    UnknownRoot(String),
}

/// A fully loaded, immutable import graph plus its root set.
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    packages: Vec<Package>,
    index: HashMap<String, NodeId>,
    roots: Vec<NodeId>,
}

impl ImportGraph {
    pub fn package(&self, id: NodeId) -> &Package {
        &self.packages[id.0]
    }

    /// Find a package by its loader id.
    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Root packages, in the order the loader reported them.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.packages.iter().map(|p| p.imports.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Package)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(i, pkg)| (NodeId(i), pkg))
    }
}

impl std::ops::Index<NodeId> for ImportGraph {
    type Output = Package;

    fn index(&self, id: NodeId) -> &Package {
        self.package(id)
    }
}

/// Strip the bracketed test-variant suffix from a loader id.
///
/// `example.com/a [example.com/a.test]` becomes `example.com/a`.
pub fn package_path(id: &str) -> &str {
    match id.find(" [") {
        Some(pos) if id.ends_with(']') => &id[..pos],
        _ => id,
    }
}

/// Unresolved description of one package, fed to [`ImportGraphBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub id: String,
    pub path: String,
    pub module: Option<String>,
    /// `(import name, target id)` pairs.
    pub imports: Vec<(String, String)>,
}

impl PackageSpec {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let path = package_path(&id).to_string();
        Self {
            id,
            path,
            module: None,
            imports: Vec::new(),
        }
    }

    #[must_use]
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Add an edge named after the target's package path.
    #[must_use]
    pub fn import(self, target_id: impl Into<String>) -> Self {
        let target_id = target_id.into();
        let name = package_path(&target_id).to_string();
        self.import_as(name, target_id)
    }

    #[must_use]
    pub fn import_as(mut self, name: impl Into<String>, target_id: impl Into<String>) -> Self {
        self.imports.push((name.into(), target_id.into()));
        self
    }
}

/// Two-pass builder: collect specs, then resolve edges by id.
#[derive(Debug, Clone, Default)]
pub struct ImportGraphBuilder {
    specs: Vec<PackageSpec>,
    roots: Vec<String>,
}

impl ImportGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(&mut self, spec: PackageSpec) -> &mut Self {
        self.specs.push(spec);
        self
    }

    pub fn root(&mut self, id: impl Into<String>) -> &mut Self {
        self.roots.push(id.into());
        self
    }

    pub fn build(self) -> Result<ImportGraph, GraphError> {
        let mut index = HashMap::with_capacity(self.specs.len());
        for (i, spec) in self.specs.iter().enumerate() {
            if index.insert(spec.id.clone(), NodeId(i)).is_some() {
                return Err(GraphError::DuplicatePackage(spec.id.clone()));
            }
        }

        let mut packages = Vec::with_capacity(self.specs.len());
        for spec in self.specs {
            let mut imports = BTreeMap::new();
            for (name, target) in spec.imports {
                let Some(&node) = index.get(&target) else {
                    return Err(GraphError::DanglingImport {
                        from: spec.id,
                        target,
                    });
                };
                imports.insert(name, node);
            }
            packages.push(Package {
                id: spec.id,
                path: spec.path,
                module: spec.module,
                imports,
            });
        }

        let roots = self
            .roots
            .into_iter()
            .map(|id| index.get(&id).copied().ok_or(GraphError::UnknownRoot(id)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ImportGraph {
            packages,
            index,
            roots,
        })
    }
}
