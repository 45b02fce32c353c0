// src/graph/raw.rs

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::graph::model::{Artifact, Origin, RawNode};

/// Raw dependency graph as produced by a [`GraphBuilder`].
///
/// Edge direction is `dependent -> dependency`. A node may be reachable
/// through several parents (shared nodes are added with [`RawGraph::link`]);
/// the projector duplicates such nodes per occurrence.
///
/// [`GraphBuilder`]: crate::graph::GraphBuilder
#[derive(Debug, Clone)]
pub struct RawGraph {
    graph: DiGraph<RawNode, ()>,
    root: NodeIndex,
}

impl RawGraph {
    /// Create a graph containing only the project root.
    pub fn new(root: Artifact) -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(RawNode {
            artifact: root,
            origin: Origin::Root,
        });
        Self { graph, root }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Add `artifact` as a dependency declared by `parent`.
    pub fn add_dependency(&mut self, parent: NodeIndex, artifact: Artifact) -> NodeIndex {
        let child = self.graph.add_node(RawNode {
            artifact,
            origin: Origin::DeclaredBy(parent),
        });
        self.graph.add_edge(parent, child, ());
        child
    }

    /// Add an extra `parent -> child` edge for a node already in the graph.
    pub fn link(&mut self, parent: NodeIndex, child: NodeIndex) {
        self.graph.add_edge(parent, child, ());
    }

    pub fn node(&self, node: NodeIndex) -> Option<&RawNode> {
        self.graph.node_weight(node)
    }

    pub fn artifact(&self, node: NodeIndex) -> Option<&Artifact> {
        self.node(node).map(|n| &n.artifact)
    }

    pub fn origin(&self, node: NodeIndex) -> Option<Origin> {
        self.node(node).map(|n| n.origin)
    }

    /// Direct dependencies of `node`, in the order the edges were added.
    pub fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (e.id(), e.target()))
            .collect();
        // petgraph yields the newest edge first; edge ids grow with insertion.
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, target)| target).collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}
