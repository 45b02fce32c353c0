// src/session/extensions.rs

use anyhow::Result;

use super::{Extension, ExtensionProvider};

/// Host components exposed to servers that still need them injected.
#[derive(Debug, Clone)]
pub struct HostExtensions {
    names: Vec<String>,
}

impl HostExtensions {
    /// Logger, build session, lifecycle executor and project builder.
    pub fn standard() -> Self {
        Self::from_names(["log", "build-session", "lifecycle-executor", "project-builder"])
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for HostExtensions {
    fn default() -> Self {
        Self::standard()
    }
}

impl ExtensionProvider for HostExtensions {
    fn create_extensions_with_dependency_property(&self) -> Result<Vec<Extension>> {
        Ok(self.names.iter().map(Extension::new).collect())
    }
}
