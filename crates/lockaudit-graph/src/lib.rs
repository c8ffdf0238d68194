//! Immutable dependency graph model (no IO).
//!
//! Input: a resolver's output, already flattened to packages plus edges.
//! Output: an arena-indexed DAG with memoized reachability queries. Nothing
//! here mutates after [`DependencyGraph::build`] returns; the policy passes
//! only read.

#![forbid(unsafe_code)]

mod graph;
mod resolution;

pub use graph::{DependencyGraph, Edge, MalformedGraphError, PackageId};
pub use resolution::{
    DependencyRef, EdgeMode, LicenseFile, Package, Resolution, ResolvedPackage,
};
