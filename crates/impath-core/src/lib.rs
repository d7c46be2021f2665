//! Core types and storage for impath.
//!
//! Provides the import graph model ([`graph::ImportGraph`]), per-project
//! configuration, and JSON snapshots of a loaded graph.

pub mod config;
pub mod graph;
pub mod schema;
pub mod storage;
