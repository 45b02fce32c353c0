// src/orchestrator/state.rs

use std::fmt;

/// Progress of a single orchestrated run.
///
/// The success path walks the variants top to bottom; any stage may end in
/// [`RunState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    Idle,
    SecretsMasked,
    Configured,
    Started,
    ExtensionsResolved,
    Running,
    Completed,
    SecretsUnmasked,
    Stopped,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Stopped | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::SecretsMasked => "secrets_masked",
            RunState::Configured => "configured",
            RunState::Started => "started",
            RunState::ExtensionsResolved => "extensions_resolved",
            RunState::Running => "running",
            RunState::Completed => "completed",
            RunState::SecretsUnmasked => "secrets_unmasked",
            RunState::Stopped => "stopped",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Session operation that failed; carried by session errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Mask,
    Start,
    ServerVersion,
    Extensions,
    Run,
    Unmask,
    Stop,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStage::Mask => "mask",
            RunStage::Start => "start",
            RunStage::ServerVersion => "server version query",
            RunStage::Extensions => "extension registration",
            RunStage::Run => "analysis",
            RunStage::Unmask => "unmask",
            RunStage::Stop => "stop",
        };
        f.write_str(s)
    }
}
