// src/graph/model.rs

use petgraph::graph::NodeIndex;
use serde::Deserialize;

/// Resolved artifact coordinates of a single graph node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artifact {
    #[serde(rename = "group")]
    pub group_id: String,
    #[serde(rename = "artifact")]
    pub artifact_id: String,
    #[serde(rename = "version")]
    pub base_version: String,
    /// Declared scope (`compile`, `test`, `system`, ...). Absent only for
    /// malformed input; projection turns it into an empty string.
    #[serde(default)]
    pub scope: Option<String>,
}

impl Artifact {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        base_version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            base_version: base_version.into(),
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Versionless identity: `group:artifact`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    pub fn scope_or_empty(&self) -> &str {
        self.scope.as_deref().unwrap_or("")
    }
}

/// Where a node sits in the raw graph.
///
/// Graph builders that mark the root with a self-referencing parent are
/// mapped onto [`Origin::Root`] at ingest time; nothing downstream compares
/// node identities to find the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The synthetic project root. Never emitted by the projector.
    Root,
    /// A dependency declared by the given parent node.
    DeclaredBy(NodeIndex),
}

impl Origin {
    pub fn is_root(&self) -> bool {
        matches!(self, Origin::Root)
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        match self {
            Origin::Root => None,
            Origin::DeclaredBy(parent) => Some(*parent),
        }
    }
}

/// Node weight stored in the raw graph.
#[derive(Debug, Clone)]
pub struct RawNode {
    pub artifact: Artifact,
    pub origin: Origin,
}
