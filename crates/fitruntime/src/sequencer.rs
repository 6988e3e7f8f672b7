use crate::registry::CleanupRegistry;
use crate::StageSchedule;
use fitcore::{EventEmitter, Stage, SubmissionState};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

pub type SharedState = Arc<Mutex<SubmissionState>>;

/// Lock the shared state, recovering it if a holder panicked
pub(crate) fn lock_state(state: &SharedState) -> MutexGuard<'_, SubmissionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Drives the simulated stage progression of a submission
#[derive(Debug, Clone)]
pub struct StageSequencer {
    schedule: StageSchedule,
}

impl StageSequencer {
    pub fn new(schedule: StageSchedule) -> Self {
        Self { schedule }
    }

    /// Enter `Stage::Parsing` now and schedule every other step at `t0 + offset`.
    ///
    /// Each transition is its own task registered with `registry`, so a
    /// late timer never depends on an earlier one having fired.
    pub fn start(
        &self,
        t0: Instant,
        state: &SharedState,
        registry: &CleanupRegistry,
        events: &EventEmitter,
    ) {
        {
            let mut current = lock_state(state);
            *current = SubmissionState::InProgress(Stage::Parsing);
            events.stage(Stage::Parsing);
        }

        for step in self.schedule.steps() {
            let deadline = t0 + step.offset();
            let stage = step.stage;
            let token = registry.token();
            let state = state.clone();
            let events = events.clone();

            let handle = tokio::spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => {}
                    _ = sleep_until(deadline) => {
                        advance(&state, &token, stage, &events);
                    }
                }
            });
            registry.register(handle);
        }
    }
}

/// Move to `stage` unless the submission was cancelled or is already past it
fn advance(
    state: &SharedState,
    token: &CancellationToken,
    stage: Stage,
    events: &EventEmitter,
) -> bool {
    let mut current = lock_state(state);
    if token.is_cancelled() {
        return false;
    }

    match *current {
        SubmissionState::InProgress(previous) if previous < stage => {
            *current = SubmissionState::InProgress(stage);
            events.stage(stage);
            tracing::debug!("Submission {} entered {:?}", events.submission_id(), stage);
            true
        }
        _ => false,
    }
}
