// src/graph/projector.rs

//! Projection of a raw dependency graph into a nested tree.
//!
//! A single post-order depth-first walk from the root builds the tree. Each
//! call returns the nodes it produced together with whether anything of
//! interest was found in its subtree, so irrelevant branches are pruned by
//! the caller once their contents are known (ancestor-or-self filter).
//!
//! Shared nodes are emitted once per occurrence. A node that is already on
//! the current path is not entered again, which keeps cyclic input finite.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use tracing::{debug, trace, warn};

use crate::codec::{self, DependencyNode};
use crate::errors::{Result, ScanlinkError};
use crate::graph::builder::GraphBuilder;
use crate::graph::filter::ProjectionFilter;
use crate::graph::raw::RawGraph;
use crate::project::Project;

/// Projects every artifact reachable from the root.
pub fn project(graph: &RawGraph) -> Vec<DependencyNode> {
    GraphProjector::new(graph, &ProjectionFilter::default()).project()
}

/// Projects reachable artifacts, keeping only nodes of interest and their
/// ancestors.
pub fn project_filtered(graph: &RawGraph, filter: &ProjectionFilter) -> Vec<DependencyNode> {
    GraphProjector::new(graph, filter).project()
}

/// What a visited subtree contributes to its parent.
struct Subtree {
    /// The node itself, or its children when the node is a root marker.
    nodes: Vec<DependencyNode>,
    /// Whether a node of interest lies in this subtree.
    relevant: bool,
}

impl Subtree {
    fn pruned() -> Self {
        Self {
            nodes: Vec::new(),
            relevant: false,
        }
    }
}

#[derive(Debug)]
pub struct GraphProjector<'a> {
    graph: &'a RawGraph,
    filter: &'a ProjectionFilter,
}

impl<'a> GraphProjector<'a> {
    pub fn new(graph: &'a RawGraph, filter: &'a ProjectionFilter) -> Self {
        Self { graph, filter }
    }

    /// Top-level dependencies of the root, each with its nested subtree.
    pub fn project(&self) -> Vec<DependencyNode> {
        let mut path = HashSet::new();
        let root = self.visit(self.graph.root(), &mut path);
        debug!(
            top_level = root.nodes.len(),
            total = root.nodes.iter().map(DependencyNode::size).sum::<usize>(),
            "projected dependency tree"
        );
        root.nodes
    }

    fn visit(&self, ix: NodeIndex, path: &mut HashSet<NodeIndex>) -> Subtree {
        let Some(node) = self.graph.node(ix) else {
            warn!(node = ix.index(), "edge points at a node missing from the graph");
            return Subtree::pruned();
        };

        path.insert(ix);

        let mut children = Vec::new();
        let mut relevant_below = false;
        for child in self.graph.children(ix) {
            if path.contains(&child) {
                trace!(
                    node = ix.index(),
                    child = child.index(),
                    "child already on the current path; not descending"
                );
                continue;
            }
            let sub = self.visit(child, path);
            if sub.relevant {
                relevant_below = true;
                children.extend(sub.nodes);
            }
        }

        path.remove(&ix);

        if node.origin.is_root() {
            // Root markers are never emitted; their children move up a level.
            return Subtree {
                nodes: children,
                relevant: relevant_below,
            };
        }

        let artifact = &node.artifact;
        let relevant = relevant_below || self.filter.is_of_interest(artifact);

        Subtree {
            nodes: vec![DependencyNode {
                key: artifact.key(),
                version: artifact.base_version.clone(),
                scope: artifact.scope_or_empty().to_string(),
                children,
            }],
            relevant,
        }
    }
}

/// Build the dependency graph of `project` and project it.
///
/// A graph that cannot be built at all is fatal; no partial tree is
/// returned.
pub fn collect_project_dependencies(
    builder: &dyn GraphBuilder,
    project: &Project,
    filter: &ProjectionFilter,
) -> Result<Vec<DependencyNode>> {
    let graph = builder
        .build_dependency_graph(project)
        .map_err(|source| ScanlinkError::GraphBuild {
            project: project.to_string(),
            source,
        })?;
    Ok(project_filtered(&graph, filter))
}

/// Build, project and encode the dependencies of `project`.
pub fn dependencies_json(
    builder: &dyn GraphBuilder,
    project: &Project,
    filter: &ProjectionFilter,
) -> Result<String> {
    let nodes = collect_project_dependencies(builder, project, filter)?;
    codec::encode(&nodes)
}
