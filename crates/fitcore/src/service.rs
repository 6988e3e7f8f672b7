use crate::{EvaluationRequest, EvaluationResult, RemoteError};
use async_trait::async_trait;

/// Remote service that scores a submitted document
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Upload the document and links, return the decoded evaluation
    async fn evaluate(&self, request: EvaluationRequest) -> Result<EvaluationResult, RemoteError>;

    /// Optional: best-effort ping used to wake the service up
    async fn warm_up(&self) -> Result<(), RemoteError> {
        Ok(())
    }
}

/// File-selection affordance invoked when a submission lacks a document.
///
/// Implementations only surface the picker; the chosen file comes back
/// through the next `SubmissionInput`.
pub trait DocumentPrompt: Send + Sync {
    fn request_document(&self);
}

/// Prompt that does nothing, for hosts without a picker
pub struct NoPrompt;

impl DocumentPrompt for NoPrompt {
    fn request_document(&self) {}
}
