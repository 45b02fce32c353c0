// src/properties.rs

//! Default [`PropertiesBuilder`]: turns host projects into analysis
//! properties, including the encoded dependency tree of every project.

use anyhow::Result;
use tracing::debug;

use crate::graph::{dependencies_json, GraphBuilder, ProjectionFilter};
use crate::project::{Project, Properties};
use crate::session::PropertiesBuilder;

/// Property holding the encoded dependency tree of a project.
pub const PROJECT_DEPENDENCIES_KEY: &str = "sonar.maven.projectDependencies";
pub const PROJECT_KEY: &str = "sonar.projectKey";
pub const PROJECT_NAME: &str = "sonar.projectName";
pub const PROJECT_VERSION: &str = "sonar.projectVersion";
pub const MODULES: &str = "sonar.modules";
pub const VERBOSE: &str = "sonar.verbose";

/// Builds run properties for a root project and its sub-projects.
///
/// Sub-project properties are prefixed with `<module id>.`. Properties
/// passed as `initial` take precedence over generated ones.
#[derive(Debug)]
pub struct ProjectPropertiesBuilder<G> {
    graph_builder: G,
    filter: ProjectionFilter,
    dependencies_key: String,
    verbose: bool,
}

impl<G: GraphBuilder> ProjectPropertiesBuilder<G> {
    pub fn new(graph_builder: G) -> Self {
        Self {
            graph_builder,
            filter: ProjectionFilter::default(),
            dependencies_key: PROJECT_DEPENDENCIES_KEY.to_string(),
            verbose: false,
        }
    }

    pub fn with_filter(mut self, filter: ProjectionFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_dependencies_key(mut self, key: impl Into<String>) -> Self {
        self.dependencies_key = key.into();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn project_properties(&self, project: &Project, prefix: &str, out: &mut Properties) -> Result<()> {
        let mut put = |key: &str, value: String| {
            out.insert(format!("{prefix}{key}"), value);
        };

        put(PROJECT_KEY, project.key());
        put(PROJECT_NAME, project.display_name().to_string());
        put(PROJECT_VERSION, project.version.clone());

        let deps = dependencies_json(&self.graph_builder, project, &self.filter)?;
        debug!(project = %project, bytes = deps.len(), "encoded project dependencies");
        put(&self.dependencies_key, deps);

        for (key, value) in &project.properties {
            put(key, value.clone());
        }
        Ok(())
    }
}

impl<G: GraphBuilder> PropertiesBuilder for ProjectPropertiesBuilder<G> {
    fn configure(
        &self,
        sub_projects: &[Project],
        root: &Project,
        initial: Properties,
    ) -> Result<Properties> {
        let mut props = Properties::new();

        self.project_properties(root, "", &mut props)?;

        if !sub_projects.is_empty() {
            let ids: Vec<&str> = sub_projects.iter().map(|p| p.id.as_str()).collect();
            props.insert(MODULES.to_string(), ids.join(","));
        }
        for module in sub_projects {
            self.project_properties(module, &format!("{}.", module.id), &mut props)?;
        }

        if self.verbose {
            props.insert(VERBOSE.to_string(), "true".to_string());
        }

        props.extend(initial);
        Ok(props)
    }
}
