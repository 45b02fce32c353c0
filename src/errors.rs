// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::orchestrator::RunStage;

#[derive(Error, Debug)]
pub enum ScanlinkError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The raw dependency graph of a project could not be built.
    #[error("Can not load the graph of dependencies of the project {project}")]
    GraphBuild {
        project: String,
        #[source]
        source: anyhow::Error,
    },

    /// The properties builder could not produce a property set for the run.
    #[error("Failed to configure analysis properties: {0}")]
    Configuration(#[source] anyhow::Error),

    /// A session operation failed; `stage` names the operation.
    #[error("Analysis session failed during {stage}")]
    Session {
        stage: RunStage,
        #[source]
        source: anyhow::Error,
    },

    /// Unmask/stop failed and there was no earlier error to report.
    #[error("Analysis session cleanup failed: {}", failures.join("; "))]
    Cleanup { failures: Vec<String> },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ScanlinkError>;
