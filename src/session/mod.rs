// src/session/mod.rs

//! Collaborators the run orchestrator talks to.
//!
//! The transport to the analysis server is not implemented here; an
//! [`AnalysisSession`] is whatever the host plugs in. [`dump::DumpSession`]
//! is the implementation the CLI uses: it writes the run properties to a
//! file instead of contacting a server.
//!
//! Collaborator errors are plain `anyhow` errors; the orchestrator attaches
//! the stage they happened in.

pub mod dump;
pub mod extensions;

use std::fmt;

use anyhow::Result;

use crate::project::{Project, Properties};

pub use dump::DumpSession;
pub use extensions::HostExtensions;

/// Host component handed to servers that cannot resolve their own
/// extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub name: String,
}

impl Extension {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// How extensions are registered with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionConvention {
    /// Servers prior to 4.5.
    Legacy,
    /// Servers from 4.5 up to (excluding) 5.2.
    Current,
}

impl ExtensionConvention {
    pub fn is_legacy(self) -> bool {
        matches!(self, ExtensionConvention::Legacy)
    }
}

/// A remote analysis session.
///
/// The orchestrator owns the session for the whole run and guarantees that
/// every successful `mask` is paired with an `unmask`, and that `stop`
/// follows `start` on every exit path.
pub trait AnalysisSession {
    fn start(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    /// Version reported by the server; `None` when it did not say.
    fn server_version(&mut self) -> Result<Option<String>>;

    fn run_analysis(&mut self, properties: &Properties) -> Result<()>;

    fn mask(&mut self, key: &str) -> Result<()>;

    fn unmask(&mut self, key: &str) -> Result<()>;

    fn add_extensions(
        &mut self,
        extensions: Vec<Extension>,
        convention: ExtensionConvention,
    ) -> Result<()>;
}

/// Supplies the host extensions registered with older servers.
pub trait ExtensionProvider {
    fn create_extensions_with_dependency_property(&self) -> Result<Vec<Extension>>;
}

/// Produces the full property set for a run.
pub trait PropertiesBuilder {
    fn configure(
        &self,
        sub_projects: &[Project],
        root: &Project,
        initial: Properties,
    ) -> Result<Properties>;
}
