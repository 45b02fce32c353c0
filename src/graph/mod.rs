// src/graph/mod.rs

//! Raw dependency graphs and their projection into nested trees.
//!
//! - [`model`] holds artifact coordinates and the tagged root marker.
//! - [`raw`] is the petgraph-backed raw graph handed over by a graph builder.
//! - [`builder`] defines the graph builder seam and a file-backed builder.
//! - [`filter`] decides which artifacts are "of interest" for projection.
//! - [`projector`] turns a raw graph into a [`DependencyNode`] forest.
//!
//! [`DependencyNode`]: crate::codec::DependencyNode

pub mod builder;
pub mod filter;
pub mod model;
pub mod projector;
pub mod raw;

/// Node handle of a [`RawGraph`].
pub use petgraph::graph::NodeIndex;

pub use builder::{parse_graph_description, FileGraphBuilder, GraphBuilder};
pub use filter::ProjectionFilter;
pub use model::{Artifact, Origin, RawNode};
pub use projector::{
    collect_project_dependencies, dependencies_json, project, project_filtered, GraphProjector,
};
pub use raw::RawGraph;
