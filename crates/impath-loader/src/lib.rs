//! Import graph loading.
//!
//! The [`GraphLoader`] trait is the seam between the search core and the
//! outside world: [`golist::GoList`] asks the Go toolchain for the package
//! graph, [`snapshot::SnapshotFile`] reads one saved earlier.

pub mod golist;
pub mod snapshot;

use impath_core::graph::{GraphError, ImportGraph};

/// Errors from obtaining an import graph.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("`{command}` exited with {status}:\n{stderr}")]
    Command {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("malformed `go list` output: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("package {package}: {message}")]
    Package { package: String, message: String },
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Snapshot(anyhow::Error),
}

/// Anything that can produce a fully populated import graph.
pub trait GraphLoader {
    fn load(&self) -> Result<ImportGraph, LoadError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}
