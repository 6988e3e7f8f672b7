use crate::Stage;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type SubmissionId = Uuid;

pub const DEFAULT_DOCUMENT_NAME: &str = "resume.pdf";

/// Binary document chosen by the user
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Raw values collected from the user for one submission.
///
/// The link fields are forwarded verbatim; empty means "not provided".
#[derive(Debug, Clone, Default)]
pub struct SubmissionInput {
    pub document: Option<Document>,
    pub github_link: String,
    pub linkedin_link: String,
}

impl SubmissionInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_github(mut self, link: impl Into<String>) -> Self {
        self.github_link = link.into();
        self
    }

    pub fn with_linkedin(mut self, link: impl Into<String>) -> Self {
        self.linkedin_link = link.into();
        self
    }
}

/// Payload of the remote scoring call
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub document: Document,
    pub github_link: String,
    pub linkedin_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail")]
pub enum SubmissionState {
    #[default]
    Idle,
    InProgress(Stage),
    Completed,
    Failed(String),
}

impl SubmissionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SubmissionState::Idle)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, SubmissionState::InProgress(_))
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            SubmissionState::InProgress(stage) => Some(*stage),
            _ => None,
        }
    }
}

/// How a call to `submit` concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Result written to the store
    Completed,
    /// Remote call failed; the user has been notified
    Failed(String),
    /// No document was selected, the file prompt was triggered instead
    DocumentRequested,
    /// The controller was torn down while the call was in flight
    Discarded,
}
