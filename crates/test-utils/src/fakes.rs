use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use scanlink::graph::{GraphBuilder, RawGraph};
use scanlink::project::{Project, Properties};
use scanlink::session::{
    AnalysisSession, Extension, ExtensionConvention, ExtensionProvider, PropertiesBuilder,
};

/// One call made on a [`RecordingSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    Start,
    Stop,
    ServerVersion,
    RunAnalysis(Properties),
    Mask(String),
    Unmask(String),
    AddExtensions {
        names: Vec<String>,
        convention: ExtensionConvention,
    },
}

/// Session operations a [`RecordingSession`] can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailAt {
    Start,
    Stop,
    ServerVersion,
    RunAnalysis,
    Mask,
    Unmask,
    AddExtensions,
}

/// A fake session that:
/// - records every call in order (failing calls included)
/// - reports a fixed server version
/// - fails the operations listed with [`RecordingSession::failing_at`].
#[derive(Debug, Clone)]
pub struct RecordingSession {
    server_version: Option<String>,
    calls: Arc<Mutex<Vec<SessionCall>>>,
    failures: HashSet<FailAt>,
}

impl RecordingSession {
    pub fn new(server_version: Option<&str>) -> Self {
        Self {
            server_version: server_version.map(str::to_string),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: HashSet::new(),
        }
    }

    pub fn failing_at(mut self, op: FailAt) -> Self {
        self.failures.insert(op);
        self
    }

    /// Shared handle on the call log; stays valid after the session moved.
    pub fn call_log(&self) -> Arc<Mutex<Vec<SessionCall>>> {
        Arc::clone(&self.calls)
    }

    pub fn calls(&self) -> Vec<SessionCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SessionCall, op: FailAt) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failures.contains(&op) {
            bail!("injected {:?} failure", op);
        }
        Ok(())
    }
}

impl AnalysisSession for RecordingSession {
    fn start(&mut self) -> Result<()> {
        self.record(SessionCall::Start, FailAt::Start)
    }

    fn stop(&mut self) -> Result<()> {
        self.record(SessionCall::Stop, FailAt::Stop)
    }

    fn server_version(&mut self) -> Result<Option<String>> {
        self.record(SessionCall::ServerVersion, FailAt::ServerVersion)?;
        Ok(self.server_version.clone())
    }

    fn run_analysis(&mut self, properties: &Properties) -> Result<()> {
        self.record(SessionCall::RunAnalysis(properties.clone()), FailAt::RunAnalysis)
    }

    fn mask(&mut self, key: &str) -> Result<()> {
        self.record(SessionCall::Mask(key.to_string()), FailAt::Mask)
    }

    fn unmask(&mut self, key: &str) -> Result<()> {
        self.record(SessionCall::Unmask(key.to_string()), FailAt::Unmask)
    }

    fn add_extensions(
        &mut self,
        extensions: Vec<Extension>,
        convention: ExtensionConvention,
    ) -> Result<()> {
        let names = extensions.into_iter().map(|e| e.name).collect();
        self.record(
            SessionCall::AddExtensions { names, convention },
            FailAt::AddExtensions,
        )
    }
}

/// Extension provider returning a fixed list and counting invocations.
#[derive(Debug, Default)]
pub struct StaticExtensionProvider {
    names: Vec<String>,
    invocations: AtomicUsize,
}

impl StaticExtensionProvider {
    pub fn new(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl ExtensionProvider for StaticExtensionProvider {
    fn create_extensions_with_dependency_property(&self) -> Result<Vec<Extension>> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        Ok(self.names.iter().map(Extension::new).collect())
    }
}

/// Properties builder returning fixed properties merged with the initial
/// ones, or failing on demand.
#[derive(Debug, Default)]
pub struct FixedPropertiesBuilder {
    properties: Properties,
    fail: bool,
}

impl FixedPropertiesBuilder {
    pub fn new(properties: &[(&str, &str)]) -> Self {
        Self {
            properties: properties
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            properties: Properties::new(),
            fail: true,
        }
    }
}

impl PropertiesBuilder for FixedPropertiesBuilder {
    fn configure(
        &self,
        _sub_projects: &[Project],
        _root: &Project,
        initial: Properties,
    ) -> Result<Properties> {
        if self.fail {
            bail!("injected configuration failure");
        }
        let mut props = self.properties.clone();
        props.extend(initial);
        Ok(props)
    }
}

/// Graph builder handing out a prepared graph for every project.
#[derive(Debug, Clone)]
pub struct StaticGraphBuilder {
    graph: RawGraph,
}

impl StaticGraphBuilder {
    pub fn new(graph: RawGraph) -> Self {
        Self { graph }
    }
}

impl GraphBuilder for StaticGraphBuilder {
    fn build_dependency_graph(&self, _project: &Project) -> Result<RawGraph> {
        Ok(self.graph.clone())
    }
}

/// Graph builder that always fails, like an unresolvable dependency.
#[derive(Debug, Clone, Default)]
pub struct FailingGraphBuilder;

impl GraphBuilder for FailingGraphBuilder {
    fn build_dependency_graph(&self, project: &Project) -> Result<RawGraph> {
        Err(anyhow!("could not resolve dependencies of {}", project.key()))
    }
}
