// src/graph/builder.rs

//! The raw graph provider seam.
//!
//! Resolving dependencies from a build manifest is not done here: a
//! [`GraphBuilder`] hands over an already resolved [`RawGraph`]. The
//! [`FileGraphBuilder`] reads graphs that an external resolver dumped as
//! JSON, which is what the CLI uses.
//!
//! Graph description format:
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "app", "group": "com.acme", "artifact": "app", "version": "1.0" },
//!     { "id": "io", "parent": "app", "group": "commons-io", "artifact": "commons-io",
//!       "version": "2.4", "scope": "compile" }
//!   ],
//!   "links": [ { "from": "app", "to": "io" } ]
//! }
//! ```
//!
//! The root is the single node without a `parent` (or whose `parent` is its
//! own id). Parents must be declared before their children; `links` add
//! extra edges for nodes shared between several parents.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use petgraph::graph::NodeIndex;
use serde::Deserialize;
use tracing::debug;

use crate::graph::model::Artifact;
use crate::graph::raw::RawGraph;
use crate::project::Project;

/// Provides the resolved dependency graph of a project.
pub trait GraphBuilder {
    fn build_dependency_graph(&self, project: &Project) -> Result<RawGraph>;
}

#[derive(Debug, Deserialize)]
struct GraphDescription {
    nodes: Vec<NodeDescription>,
    #[serde(default)]
    links: Vec<LinkDescription>,
}

#[derive(Debug, Deserialize)]
struct NodeDescription {
    id: String,
    #[serde(default)]
    parent: Option<String>,
    #[serde(flatten)]
    artifact: Artifact,
}

impl NodeDescription {
    fn is_root(&self) -> bool {
        match &self.parent {
            None => true,
            Some(parent) => parent == &self.id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LinkDescription {
    from: String,
    to: String,
}

/// Reads per-project graph descriptions from JSON files.
///
/// Projects without a registered file get a graph containing only their
/// own root node.
#[derive(Debug, Clone, Default)]
pub struct FileGraphBuilder {
    graphs: HashMap<String, PathBuf>,
}

impl FileGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the graph file for the project with module id `project_id`.
    pub fn with_graph(mut self, project_id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.graphs.insert(project_id.into(), path.into());
        self
    }

    pub fn graph_path(&self, project_id: &str) -> Option<&Path> {
        self.graphs.get(project_id).map(PathBuf::as_path)
    }
}

impl GraphBuilder for FileGraphBuilder {
    fn build_dependency_graph(&self, project: &Project) -> Result<RawGraph> {
        let Some(path) = self.graph_path(&project.id) else {
            debug!(project = %project, "no graph description registered; using empty graph");
            return Ok(RawGraph::new(project.as_artifact()));
        };

        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading graph description {:?}", path))?;
        parse_graph_description(&contents)
            .with_context(|| format!("parsing graph description {:?}", path))
    }
}

/// Build a [`RawGraph`] from the JSON graph description format.
pub fn parse_graph_description(json: &str) -> Result<RawGraph> {
    let description: GraphDescription = serde_json::from_str(json)?;

    let mut roots = description.nodes.iter().filter(|n| n.is_root());
    let root = roots
        .next()
        .ok_or_else(|| anyhow!("graph description has no root node"))?;
    if let Some(other) = roots.next() {
        bail!(
            "graph description has more than one root node ('{}' and '{}')",
            root.id,
            other.id
        );
    }

    let mut graph = RawGraph::new(root.artifact.clone());
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    index.insert(root.id.as_str(), graph.root());

    for node in description.nodes.iter().filter(|n| !n.is_root()) {
        if index.contains_key(node.id.as_str()) {
            bail!("duplicate node id '{}' in graph description", node.id);
        }
        let parent_id = node.parent.as_deref().unwrap_or_default();
        let parent = *index.get(parent_id).ok_or_else(|| {
            anyhow!(
                "node '{}' references parent '{}' which is not declared before it",
                node.id,
                parent_id
            )
        })?;
        let ix = graph.add_dependency(parent, node.artifact.clone());
        index.insert(node.id.as_str(), ix);
    }

    for link in &description.links {
        let from = *index
            .get(link.from.as_str())
            .ok_or_else(|| anyhow!("link references unknown node '{}'", link.from))?;
        let to = *index
            .get(link.to.as_str())
            .ok_or_else(|| anyhow!("link references unknown node '{}'", link.to))?;
        graph.link(from, to);
    }

    debug!(nodes = graph.node_count(), "parsed graph description");
    Ok(graph)
}
