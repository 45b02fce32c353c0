// src/orchestrator/run.rs

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::errors::{Result, ScanlinkError};
use crate::mask::SensitiveKeys;
use crate::orchestrator::bands::extension_convention;
use crate::orchestrator::state::{RunStage, RunState};
use crate::project::{Project, Properties};
use crate::session::{AnalysisSession, ExtensionConvention, ExtensionProvider, PropertiesBuilder};
use crate::version::ServerVersion;

/// Advisory emitted when the server does not report a usable version.
pub const UNKNOWN_VERSION_ADVISORY: &str = "Unable to determine the server version; assuming a \
server prior to 4.5. With servers prior to 5.2 it is recommended to use a client from the 2.6 line";

/// What the host wants analysed.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub root: Project,
    pub sub_projects: Vec<Project>,
    /// Host properties passed on top of the generated ones.
    pub properties: Properties,
}

impl RunRequest {
    pub fn new(root: Project) -> Self {
        Self {
            root,
            sub_projects: Vec::new(),
            properties: Properties::new(),
        }
    }

    /// Every property key the host intends to pass, as it will appear in the
    /// run properties (sub-project keys carry their module prefix).
    pub fn property_keys(&self) -> BTreeSet<String> {
        let mut keys: BTreeSet<String> = self.properties.keys().cloned().collect();
        keys.extend(self.root.properties.keys().cloned());
        for module in &self.sub_projects {
            keys.extend(
                module
                    .properties
                    .keys()
                    .map(|key| format!("{}.{}", module.id, key)),
            );
        }
        keys
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub state: RunState,
    pub server_version: ServerVersion,
    /// Convention used to register extensions; `None` when none were sent.
    pub extension_convention: Option<ExtensionConvention>,
    pub extensions_registered: usize,
    pub masked_keys: Vec<String>,
    pub advisories: Vec<String>,
}

/// Drives one analysis run against an [`AnalysisSession`].
///
/// Sequence: mask sensitive keys, configure properties, start, query the
/// server version, inject extensions for old servers, run, then unmask and
/// stop. Once masking began every exit path unmasks; once `start` was
/// attempted every exit path also stops. Cleanup failures never hide the
/// error that caused the run to fail.
pub struct RunOrchestrator<'a, S: AnalysisSession> {
    session: S,
    extensions: &'a dyn ExtensionProvider,
    properties_builder: &'a dyn PropertiesBuilder,
    sensitive: SensitiveKeys,
    state: RunState,
}

impl<'a, S: AnalysisSession> RunOrchestrator<'a, S> {
    pub fn new(
        session: S,
        extensions: &'a dyn ExtensionProvider,
        properties_builder: &'a dyn PropertiesBuilder,
        sensitive: SensitiveKeys,
    ) -> Self {
        Self {
            session,
            extensions,
            properties_builder,
            sensitive,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    pub fn execute(&mut self, request: &RunRequest) -> Result<RunReport> {
        info!(project = %request.root, modules = request.sub_projects.len(), "starting analysis run");

        let mut masked = Vec::new();
        if let Err(err) = self.mask_sensitive(request, &mut masked) {
            return Err(self.abort_before_start(err, &masked));
        }
        self.transition(RunState::SecretsMasked);

        let properties = match self.configure(request) {
            Ok(p) => p,
            Err(err) => return Err(self.abort_before_start(err, &masked)),
        };
        self.transition(RunState::Configured);

        let outcome = self.run_session(&properties, &masked);
        let cleanup_failures = self.cleanup(&masked);

        match outcome {
            Err(err) => {
                for failure in &cleanup_failures {
                    warn!(error = %failure, "cleanup failed after an earlier error; ignoring");
                }
                self.transition(RunState::Failed);
                Err(err)
            }
            Ok(_) if !cleanup_failures.is_empty() => {
                self.transition(RunState::Failed);
                Err(ScanlinkError::Cleanup {
                    failures: cleanup_failures,
                })
            }
            Ok(mut report) => {
                report.state = self.state;
                info!(project = %request.root, "analysis run finished");
                Ok(report)
            }
        }
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "run state transition");
        self.state = next;
    }

    fn mask_sensitive(&mut self, request: &RunRequest, masked: &mut Vec<String>) -> Result<()> {
        let keys = request.property_keys();
        for key in self.sensitive.select(keys.iter().map(String::as_str)) {
            self.session
                .mask(&key)
                .map_err(|source| ScanlinkError::Session {
                    stage: RunStage::Mask,
                    source,
                })?;
            debug!(key = %key, "masked sensitive property");
            masked.push(key);
        }
        Ok(())
    }

    fn configure(&self, request: &RunRequest) -> Result<Properties> {
        self.properties_builder
            .configure(
                &request.sub_projects,
                &request.root,
                request.properties.clone(),
            )
            .map_err(|source| match source.downcast::<ScanlinkError>() {
                // Graph build failures keep their own identity.
                Ok(err @ ScanlinkError::GraphBuild { .. }) => err,
                Ok(other) => ScanlinkError::Configuration(other.into()),
                Err(source) => ScanlinkError::Configuration(source),
            })
    }

    /// Start through run. Cleanup is left to the caller.
    fn run_session(&mut self, properties: &Properties, masked: &[String]) -> Result<RunReport> {
        self.session.start().map_err(|source| ScanlinkError::Session {
            stage: RunStage::Start,
            source,
        })?;
        self.transition(RunState::Started);

        let raw_version = self
            .session
            .server_version()
            .map_err(|source| ScanlinkError::Session {
                stage: RunStage::ServerVersion,
                source,
            })?;
        let server_version = ServerVersion::parse(raw_version.as_deref());
        info!(server_version = %server_version, "connected to analysis server");

        let mut advisories = Vec::new();
        if !server_version.is_known() {
            warn!("{}", UNKNOWN_VERSION_ADVISORY);
            advisories.push(UNKNOWN_VERSION_ADVISORY.to_string());
        }

        let convention = extension_convention(&server_version);
        let mut extensions_registered = 0;
        if let Some(convention) = convention {
            let extensions = self
                .extensions
                .create_extensions_with_dependency_property()
                .map_err(|source| ScanlinkError::Session {
                    stage: RunStage::Extensions,
                    source,
                })?;
            extensions_registered = extensions.len();
            debug!(
                legacy = convention.is_legacy(),
                count = extensions_registered,
                "registering extensions"
            );
            self.session
                .add_extensions(extensions, convention)
                .map_err(|source| ScanlinkError::Session {
                    stage: RunStage::Extensions,
                    source,
                })?;
        } else {
            debug!("server resolves its own extensions; none registered");
        }
        self.transition(RunState::ExtensionsResolved);

        self.transition(RunState::Running);
        self.session
            .run_analysis(properties)
            .map_err(|source| ScanlinkError::Session {
                stage: RunStage::Run,
                source,
            })?;
        self.transition(RunState::Completed);

        Ok(RunReport {
            state: self.state,
            server_version,
            extension_convention: convention,
            extensions_registered,
            masked_keys: masked.to_vec(),
            advisories,
        })
    }

    /// Unmask, then stop. Both are always attempted; failures are returned.
    fn cleanup(&mut self, masked: &[String]) -> Vec<String> {
        let mut failures = self.unmask_all(masked);
        if failures.is_empty() {
            self.transition(RunState::SecretsUnmasked);
        }

        match self.session.stop() {
            Ok(()) => {
                if failures.is_empty() {
                    self.transition(RunState::Stopped);
                }
            }
            Err(source) => failures.push(cleanup_failure(RunStage::Stop, &source)),
        }
        failures
    }

    fn unmask_all(&mut self, masked: &[String]) -> Vec<String> {
        let mut failures = Vec::new();
        for key in masked {
            if let Err(source) = self.session.unmask(key) {
                failures.push(cleanup_failure(RunStage::Unmask, &source));
            }
        }
        failures
    }

    /// Failure before `start`: unmask whatever was masked, no stop.
    fn abort_before_start(&mut self, err: ScanlinkError, masked: &[String]) -> ScanlinkError {
        for failure in self.unmask_all(masked) {
            warn!(error = %failure, "cleanup failed after an earlier error; ignoring");
        }
        self.transition(RunState::Failed);
        err
    }
}

/// One line per cleanup failure, cause chain included.
fn cleanup_failure(stage: RunStage, source: &anyhow::Error) -> String {
    format!("{stage} failed: {source:#}")
}
