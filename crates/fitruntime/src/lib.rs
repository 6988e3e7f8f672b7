//! Submission runtime
//!
//! This crate provides the submission controller together with the stage
//! sequencer that simulates progress, the cleanup registry that keeps late
//! timers from touching a finished submission, and the result store.

mod config;
mod controller;
mod registry;
mod sequencer;
mod store;

pub use config::{ControllerConfig, StageSchedule, StageStep, MAX_EVENT_BUFFER};
pub use controller::SubmissionController;
pub use registry::CleanupRegistry;
pub use sequencer::{SharedState, StageSequencer};
pub use store::ResultStore;
