// src/project.rs

//! Minimal host project model.
//!
//! Loading real build descriptors is the host's business; the analysis
//! bridge only needs coordinates, a display name and the properties the
//! host wants passed through.

use std::collections::BTreeMap;
use std::fmt;

use crate::graph::Artifact;

/// Analysis properties, kept sorted so dumps and logs are stable.
pub type Properties = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Module id (`"root"` for the top-level project).
    pub id: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub name: Option<String>,
    /// Properties declared by the host for this project.
    pub properties: Properties,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            name: None,
            properties: Properties::new(),
        }
    }

    /// `group:artifact`, also used as the analysis project key.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.artifact_id)
    }

    /// The project itself as the root artifact of its dependency graph.
    pub fn as_artifact(&self) -> Artifact {
        Artifact::new(&self.group_id, &self.artifact_id, &self.version)
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
