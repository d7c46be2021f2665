//! Navigation over a loaded import graph.
//!
//! [`walk`] finds every route from the roots to packages matching a pattern,
//! [`merge`] folds those routes into a prefix-sharing forest, and [`render`]
//! draws the forest as text or JSON.

pub mod merge;
pub mod render;
pub mod walk;
