// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::graph::{FileGraphBuilder, ProjectionFilter};
use crate::mask::SensitiveKeys;
use crate::project::Project;
use crate::properties::PROJECT_DEPENDENCIES_KEY;

/// Module id used for the top-level project.
pub const ROOT_PROJECT_ID: &str = "root";

/// Configuration as read from TOML, before validation.
///
/// ```toml
/// [scanner]
/// masked_keys = ["sonar.login", "*.password"]
///
/// [session]
/// server_version = "5.1"
///
/// [project]
/// group = "com.acme"
/// artifact = "app"
/// version = "1.0"
/// graph = "deps/app.json"
///
/// [module.core]
/// group = "com.acme"
/// artifact = "core"
/// version = "1.0"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub scanner: ScannerSection,

    #[serde(default)]
    pub dependencies: DependenciesSection,

    #[serde(default)]
    pub session: SessionSection,

    /// The root project.
    pub project: ProjectSection,

    /// Sub-projects from `[module.<id>]`, keyed by module id.
    #[serde(default)]
    pub module: BTreeMap<String, ProjectSection>,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub scanner: ScannerSection,
    pub dependencies: DependenciesSection,
    pub session: SessionSection,
    pub project: ProjectSection,
    pub module: BTreeMap<String, ProjectSection>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            scanner: raw.scanner,
            dependencies: raw.dependencies,
            session: raw.session,
            project: raw.project,
            module: raw.module,
        }
    }

    pub fn root_project(&self) -> Project {
        self.project.to_project(ROOT_PROJECT_ID)
    }

    pub fn sub_projects(&self) -> Vec<Project> {
        self.module
            .iter()
            .map(|(id, section)| section.to_project(id))
            .collect()
    }

    /// Patterns were checked during validation, so this only fails if the
    /// config was built without it.
    pub fn sensitive_keys(&self) -> anyhow::Result<SensitiveKeys> {
        SensitiveKeys::new(self.scanner.masked_keys.iter().cloned())
    }

    pub fn projection_filter(&self) -> ProjectionFilter {
        ProjectionFilter::excluding_scopes(self.dependencies.exclude_scopes.iter().cloned())
    }

    /// Graph builder reading the configured graph files, relative to
    /// `base_dir`.
    pub fn graph_builder(&self, base_dir: &Path) -> FileGraphBuilder {
        let mut builder = FileGraphBuilder::new();
        if let Some(graph) = &self.project.graph {
            builder = builder.with_graph(ROOT_PROJECT_ID, base_dir.join(graph));
        }
        for (id, section) in &self.module {
            if let Some(graph) = &section.graph {
                builder = builder.with_graph(id.clone(), base_dir.join(graph));
            }
        }
        builder
    }
}

/// `[scanner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannerSection {
    /// Skip the analysis entirely.
    #[serde(default)]
    pub skip: bool,

    /// Adds `sonar.verbose=true` to the run properties.
    #[serde(default)]
    pub verbose: bool,

    /// Glob patterns of property keys masked during the run.
    #[serde(default)]
    pub masked_keys: Vec<String>,

    /// Property under which the encoded dependency tree is stored.
    #[serde(default = "default_dependencies_key")]
    pub dependencies_key: String,
}

fn default_dependencies_key() -> String {
    PROJECT_DEPENDENCIES_KEY.to_string()
}

impl Default for ScannerSection {
    fn default() -> Self {
        Self {
            skip: false,
            verbose: false,
            masked_keys: Vec::new(),
            dependencies_key: default_dependencies_key(),
        }
    }
}

/// `[dependencies]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DependenciesSection {
    /// Scopes whose artifacts are only kept when something of interest
    /// depends through them.
    #[serde(default)]
    pub exclude_scopes: Vec<String>,
}

/// `[session]` section, used by the dump session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSection {
    /// Version the session reports. Absent means "unknown".
    #[serde(default)]
    pub server_version: Option<String>,

    #[serde(default = "default_dump_file")]
    pub dump_file: PathBuf,
}

fn default_dump_file() -> PathBuf {
    PathBuf::from("target/dump.properties")
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            server_version: None,
            dump_file: default_dump_file(),
        }
    }
}

/// `[project]` and `[module.<id>]` sections.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    pub group: String,
    pub artifact: String,
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Graph description file (JSON), relative to the config file.
    #[serde(default)]
    pub graph: Option<PathBuf>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ProjectSection {
    pub fn to_project(&self, id: &str) -> Project {
        let mut project = Project::new(id, &self.group, &self.artifact, &self.version);
        project.name = self.name.clone();
        project.properties = self.properties.clone();
        project
    }

    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }
}
