//! Core abstractions for the FitStack client
//!
//! This crate provides the domain types, error types, event bus and service
//! traits that the runtime, the HTTP client and the CLI depend on. It has no
//! runtime dependencies.

mod error;
mod evaluation;
pub mod events;
mod service;
mod stage;
mod submission;

pub use error::{FitError, RemoteError, SubmitError};
pub use evaluation::{EvaluationResult, Role, MAX_SCORE};
pub use events::*;
pub use service::{DocumentPrompt, NoPrompt, ScoringService};
pub use stage::Stage;
pub use submission::{
    Document, EvaluationRequest, SubmissionId, SubmissionInput, SubmissionState, SubmitOutcome,
    DEFAULT_DOCUMENT_NAME,
};

/// Result type for client operations
pub type Result<T> = std::result::Result<T, FitError>;
