// src/orchestrator/mod.rs

//! Version-gated analysis run.
//!
//! - [`state`] holds the run state machine and the stage labels used in
//!   session errors.
//! - [`bands`] maps server versions to extension registration behaviour.
//! - [`run`] contains [`RunOrchestrator`], which sequences the session calls
//!   and guarantees cleanup.

pub mod bands;
pub mod run;
pub mod state;

pub use bands::{extension_convention, EXTENSION_BANDS};
pub use run::{RunOrchestrator, RunReport, RunRequest, UNKNOWN_VERSION_ADVISORY};
pub use state::{RunStage, RunState};
