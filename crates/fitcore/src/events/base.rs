use crate::{Stage, SubmissionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events emitted during a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SubmissionEvent {
    SubmissionStarted {
        submission_id: SubmissionId,
        timestamp: DateTime<Utc>,
    },
    StageEntered {
        submission_id: SubmissionId,
        stage: Stage,
        timestamp: DateTime<Utc>,
    },
    SubmissionCompleted {
        submission_id: SubmissionId,
        roles: usize,
        best_fit: Option<String>,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    /// User-visible failure notification
    SubmissionFailed {
        submission_id: SubmissionId,
        error: String,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },
    SubmissionDiscarded {
        submission_id: SubmissionId,
        timestamp: DateTime<Utc>,
    },
    DocumentRequested {
        timestamp: DateTime<Utc>,
    },
}

impl SubmissionEvent {
    pub fn submission_id(&self) -> Option<SubmissionId> {
        match self {
            SubmissionEvent::SubmissionStarted { submission_id, .. }
            | SubmissionEvent::StageEntered { submission_id, .. }
            | SubmissionEvent::SubmissionCompleted { submission_id, .. }
            | SubmissionEvent::SubmissionFailed { submission_id, .. }
            | SubmissionEvent::SubmissionDiscarded { submission_id, .. } => Some(*submission_id),
            SubmissionEvent::DocumentRequested { .. } => None,
        }
    }
}

/// Event emitter scoped to one submission
#[derive(Clone)]
pub struct EventEmitter {
    submission_id: SubmissionId,
    sender: broadcast::Sender<SubmissionEvent>,
}

impl EventEmitter {
    pub fn new(submission_id: SubmissionId, sender: broadcast::Sender<SubmissionEvent>) -> Self {
        Self {
            submission_id,
            sender,
        }
    }

    pub fn submission_id(&self) -> SubmissionId {
        self.submission_id
    }

    pub fn started(&self) {
        let _ = self.sender.send(SubmissionEvent::SubmissionStarted {
            submission_id: self.submission_id,
            timestamp: Utc::now(),
        });
    }

    pub fn stage(&self, stage: Stage) {
        let _ = self.sender.send(SubmissionEvent::StageEntered {
            submission_id: self.submission_id,
            stage,
            timestamp: Utc::now(),
        });
    }

    pub fn completed(&self, roles: usize, best_fit: Option<String>, duration_ms: u64) {
        let _ = self.sender.send(SubmissionEvent::SubmissionCompleted {
            submission_id: self.submission_id,
            roles,
            best_fit,
            duration_ms,
            timestamp: Utc::now(),
        });
    }

    pub fn failed(&self, error: impl Into<String>, duration_ms: u64) {
        let _ = self.sender.send(SubmissionEvent::SubmissionFailed {
            submission_id: self.submission_id,
            error: error.into(),
            duration_ms,
            timestamp: Utc::now(),
        });
    }

    pub fn discarded(&self) {
        let _ = self.sender.send(SubmissionEvent::SubmissionDiscarded {
            submission_id: self.submission_id,
            timestamp: Utc::now(),
        });
    }
}

/// Broadcast bus shared by every submission of a controller
pub struct EventBus {
    sender: broadcast::Sender<SubmissionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: SubmissionEvent) {
        let _ = self.sender.send(event);
    }

    pub fn create_emitter(&self, submission_id: SubmissionId) -> EventEmitter {
        EventEmitter::new(submission_id, self.sender.clone())
    }
}
