// src/graph/filter.rs

use std::collections::BTreeSet;

use crate::graph::model::Artifact;

/// Decides which artifacts are "of interest" during projection.
///
/// Nodes that are not of interest are still emitted when something of
/// interest lies beneath them (ancestor-or-self filter). The default filter
/// accepts every artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionFilter {
    excluded_scopes: BTreeSet<String>,
}

impl ProjectionFilter {
    pub fn excluding_scopes<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded_scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_of_interest(&self, artifact: &Artifact) -> bool {
        !self.excluded_scopes.contains(artifact.scope_or_empty())
    }

    pub fn accepts_everything(&self) -> bool {
        self.excluded_scopes.is_empty()
    }
}
