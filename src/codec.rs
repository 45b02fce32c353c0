// src/codec.rs

//! Compact JSON encoding of projected dependency trees.
//!
//! Every node becomes `{"k":key,"v":version,"s":scope,"d":[children]}` with
//! the keys in exactly that order and no whitespace. Element order follows
//! the projection (discovery order), it is not sorted.

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// One occurrence of an artifact in the projected tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// `group:artifact`, no version.
    #[serde(rename = "k")]
    pub key: String,
    #[serde(rename = "v")]
    pub version: String,
    /// Empty when the graph did not record a scope.
    #[serde(rename = "s")]
    pub scope: String,
    #[serde(rename = "d", default)]
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    pub fn new(
        key: impl Into<String>,
        version: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            version: version.into(),
            scope: scope.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: DependencyNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(DependencyNode::size).sum::<usize>()
    }
}

/// Encode a projected forest.
pub fn encode(nodes: &[DependencyNode]) -> Result<String> {
    Ok(serde_json::to_string(nodes)?)
}

/// Decode a payload produced by [`encode`].
///
/// Every tree level is two JSON levels (the node object and its `d` array),
/// so serde_json's default nesting limit would cap trees at 63 levels.
pub fn decode(json: &str) -> Result<Vec<DependencyNode>> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let nodes = Vec::<DependencyNode>::deserialize(&mut de)?;
    de.end()?;
    Ok(nodes)
}
