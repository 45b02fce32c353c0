#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};

use scanlink::config::{
    ConfigFile, DependenciesSection, ProjectSection, RawConfigFile, ScannerSection,
    SessionSection,
};
use scanlink::graph::{Artifact, NodeIndex, RawGraph};

/// Parse `"group:artifact:version"` into an [`Artifact`].
pub fn artifact(coords: &str, scope: Option<&str>) -> Artifact {
    let mut parts = coords.splitn(3, ':');
    let group = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();
    let version = parts.next().unwrap_or_default();
    let artifact = Artifact::new(group, name, version);
    match scope {
        Some(scope) => artifact.with_scope(scope),
        None => artifact,
    }
}

/// Fluent construction of raw graphs, addressing nodes by test-local ids.
///
/// ```ignore
/// let graph = GraphFixture::new("com.acme:app:1.0")
///     .dep("root", "io", "commons-io:commons-io:2.4", Some("compile"))
///     .dep("io", "lang", "commons-lang:commons-lang:2.6", Some("compile"))
///     .build();
/// ```
pub struct GraphFixture {
    graph: RawGraph,
    ids: HashMap<String, NodeIndex>,
}

impl GraphFixture {
    /// The root node gets the id `"root"`.
    pub fn new(root_coords: &str) -> Self {
        let graph = RawGraph::new(artifact(root_coords, None));
        let mut ids = HashMap::new();
        ids.insert("root".to_string(), graph.root());
        Self { graph, ids }
    }

    pub fn dep(mut self, parent: &str, id: &str, coords: &str, scope: Option<&str>) -> Self {
        let parent = self.node(parent);
        let ix = self.graph.add_dependency(parent, artifact(coords, scope));
        self.ids.insert(id.to_string(), ix);
        self
    }

    /// Extra edge to an existing node (shared dependency or cycle).
    pub fn link(mut self, parent: &str, child: &str) -> Self {
        let parent = self.node(parent);
        let child = self.node(child);
        self.graph.link(parent, child);
        self
    }

    pub fn node(&self, id: &str) -> NodeIndex {
        *self
            .ids
            .get(id)
            .unwrap_or_else(|| panic!("unknown fixture node id '{id}'"))
    }

    pub fn graph(&self) -> &RawGraph {
        &self.graph
    }

    pub fn build(self) -> RawGraph {
        self.graph
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(group: &str, artifact: &str, version: &str) -> Self {
        Self {
            config: RawConfigFile {
                scanner: ScannerSection::default(),
                dependencies: DependenciesSection::default(),
                session: SessionSection::default(),
                project: project_section(group, artifact, version),
                module: BTreeMap::new(),
            },
        }
    }

    pub fn with_root_graph(mut self, path: &str) -> Self {
        self.config.project.graph = Some(path.into());
        self
    }

    pub fn with_root_property(mut self, key: &str, value: &str) -> Self {
        self.config
            .project
            .properties
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_module(mut self, id: &str, section: ProjectSection) -> Self {
        self.config.module.insert(id.to_string(), section);
        self
    }

    pub fn with_masked_key(mut self, pattern: &str) -> Self {
        self.config.scanner.masked_keys.push(pattern.to_string());
        self
    }

    pub fn with_excluded_scope(mut self, scope: &str) -> Self {
        self.config
            .dependencies
            .exclude_scopes
            .push(scope.to_string());
        self
    }

    pub fn with_server_version(mut self, version: &str) -> Self {
        self.config.session.server_version = Some(version.to_string());
        self
    }

    pub fn with_dump_file(mut self, path: &str) -> Self {
        self.config.session.dump_file = path.into();
        self
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.config.scanner.verbose = val;
        self
    }

    pub fn skip(mut self, val: bool) -> Self {
        self.config.scanner.skip = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// A `[project]` / `[module.<id>]` section with no graph and no properties.
pub fn project_section(group: &str, artifact: &str, version: &str) -> ProjectSection {
    ProjectSection {
        group: group.to_string(),
        artifact: artifact.to_string(),
        version: version.to_string(),
        name: None,
        graph: None,
        properties: BTreeMap::new(),
    }
}
