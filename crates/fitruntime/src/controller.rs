use crate::registry::CleanupRegistry;
use crate::sequencer::{lock_state, SharedState, StageSequencer};
use crate::{ControllerConfig, ResultStore};
use fitcore::{
    DocumentPrompt, EvaluationRequest, EvaluationResult, EventBus, EventEmitter, NoPrompt,
    RemoteError, ScoringService, SubmissionEvent, SubmissionId, SubmissionInput, SubmissionState,
    SubmitError, SubmitOutcome,
};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// State machine for the submission lifecycle.
///
/// One submission runs at a time. `teardown` (or dropping the controller)
/// ends the owning context: pending stage transitions are cancelled, an
/// in-flight response is discarded, and the controller refuses further work.
pub struct SubmissionController {
    service: Arc<dyn ScoringService>,
    prompt: Arc<dyn DocumentPrompt>,
    sequencer: StageSequencer,
    config: ControllerConfig,
    state: SharedState,
    store: ResultStore,
    event_bus: Arc<EventBus>,
    context: CancellationToken,
    active: Mutex<Option<Arc<CleanupRegistry>>>,
    busy: AtomicBool,
}

impl SubmissionController {
    pub fn new(service: Arc<dyn ScoringService>, config: ControllerConfig) -> Self {
        let event_bus = Arc::new(EventBus::new(config.effective_event_buffer()));
        Self {
            service,
            prompt: Arc::new(NoPrompt),
            sequencer: StageSequencer::new(config.schedule.clone()),
            config,
            state: Arc::new(Mutex::new(SubmissionState::Idle)),
            store: ResultStore::new(),
            event_bus,
            context: CancellationToken::new(),
            active: Mutex::new(None),
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_prompt(mut self, prompt: Arc<dyn DocumentPrompt>) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn state(&self) -> SubmissionState {
        lock_state(&self.state).clone()
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn result(&self) -> Option<Arc<EvaluationResult>> {
        self.store.get()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.event_bus.subscribe()
    }

    /// Stage transitions of the current submission that have not fired yet
    pub fn pending_transitions(&self) -> usize {
        self.active_registry()
            .map(|registry| registry.pending())
            .unwrap_or(0)
    }

    pub fn is_torn_down(&self) -> bool {
        self.context.is_cancelled()
    }

    /// Run one submission to completion.
    ///
    /// Remote failures are reported through `SubmitOutcome::Failed` and a
    /// `SubmissionFailed` event; the only error is a rejected concurrent submit.
    pub async fn submit(&self, input: SubmissionInput) -> Result<SubmitOutcome, SubmitError> {
        if self.context.is_cancelled() {
            return Ok(SubmitOutcome::Discarded);
        }

        if self.busy.swap(true, Ordering::AcqRel) {
            tracing::warn!("Rejected submit while another submission is in progress");
            return Err(SubmitError::AlreadyInProgress);
        }

        let Some(document) = input.document else {
            self.busy.store(false, Ordering::Release);
            tracing::info!("No document selected, requesting one");
            self.prompt.request_document();
            self.event_bus.emit(SubmissionEvent::DocumentRequested {
                timestamp: Utc::now(),
            });
            return Ok(SubmitOutcome::DocumentRequested);
        };

        let submission_id = SubmissionId::new_v4();
        let registry = Arc::new(CleanupRegistry::with_parent(&self.context));
        let guard = ActiveSubmission::enter(self, registry.clone());
        let events = self.event_bus.create_emitter(submission_id);

        self.store.clear();
        let t0 = Instant::now();
        tracing::info!(
            "Starting submission {} ({}, {} bytes)",
            submission_id,
            document.file_name,
            document.len()
        );
        events.started();
        self.sequencer.start(t0, &self.state, &registry, &events);

        let request = EvaluationRequest {
            document,
            github_link: input.github_link,
            linkedin_link: input.linkedin_link,
        };

        let response = tokio::select! {
            _ = self.context.cancelled() => None,
            response = self.service.evaluate(request) => Some(response),
        };

        let outcome = match response {
            None => self.discard(&registry, &events),
            Some(Ok(result)) => {
                let floor = t0 + self.config.minimum_duration();
                let floor_met = tokio::select! {
                    _ = self.context.cancelled() => false,
                    _ = sleep_until(floor) => true,
                };
                if floor_met {
                    self.complete(result, t0, &registry, &events)
                } else {
                    self.discard(&registry, &events)
                }
            }
            Some(Err(error)) => self.fail(error, t0, &registry, &events),
        };

        guard.finish();
        Ok(outcome)
    }

    fn complete(
        &self,
        result: EvaluationResult,
        t0: Instant,
        registry: &CleanupRegistry,
        events: &EventEmitter,
    ) -> SubmitOutcome {
        registry.cancel_all();

        let mut state = lock_state(&self.state);
        let roles = result.roles.len();
        let best_fit = result.best_fit.clone();
        if !self.store.set_unless_cancelled(result, &self.context) {
            drop(state);
            return self.discard(registry, events);
        }

        *state = SubmissionState::Completed;
        let duration_ms = t0.elapsed().as_millis() as u64;

        tracing::info!(
            "Submission {} completed in {}ms with {} roles",
            events.submission_id(),
            duration_ms,
            roles
        );
        events.completed(roles, best_fit, duration_ms);
        *state = SubmissionState::Idle;

        SubmitOutcome::Completed
    }

    fn fail(
        &self,
        error: RemoteError,
        t0: Instant,
        registry: &CleanupRegistry,
        events: &EventEmitter,
    ) -> SubmitOutcome {
        registry.cancel_all();

        let mut state = lock_state(&self.state);
        if self.context.is_cancelled() {
            drop(state);
            return self.discard(registry, events);
        }

        let reason = error.to_string();
        *state = SubmissionState::Failed(reason.clone());
        let duration_ms = t0.elapsed().as_millis() as u64;

        tracing::warn!(
            "Submission {} failed after {}ms: {}",
            events.submission_id(),
            duration_ms,
            reason
        );
        events.failed(reason.clone(), duration_ms);
        *state = SubmissionState::Idle;

        SubmitOutcome::Failed(reason)
    }

    /// The owning context is gone: drop the response without touching state or store
    fn discard(&self, registry: &CleanupRegistry, events: &EventEmitter) -> SubmitOutcome {
        registry.cancel_all();
        tracing::warn!(
            "Discarding submission {} after teardown",
            events.submission_id()
        );
        events.discarded();
        SubmitOutcome::Discarded
    }

    /// End the owning context. Idempotent.
    pub fn teardown(&self) {
        if self.context.is_cancelled() {
            return;
        }
        self.context.cancel();
        // Writers that checked the context before it was cancelled finish before teardown returns
        drop(lock_state(&self.state));
        self.store.barrier();

        if let Some(registry) = self.take_active_registry() {
            let cancelled = registry.cancel_all();
            tracing::debug!("Teardown cancelled {} pending stage transitions", cancelled);
        }
    }

    fn active_registry(&self) -> Option<Arc<CleanupRegistry>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn take_active_registry(&self) -> Option<Arc<CleanupRegistry>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    fn set_active_registry(&self, registry: Option<Arc<CleanupRegistry>>) {
        *self
            .active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = registry;
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Bookkeeping for the running submission.
///
/// If the `submit` future is dropped mid-flight, the guard cancels the
/// registry, releases the busy flag and resets the state to `Idle`.
struct ActiveSubmission<'a> {
    controller: &'a SubmissionController,
    registry: Arc<CleanupRegistry>,
    finished: bool,
}

impl<'a> ActiveSubmission<'a> {
    fn enter(controller: &'a SubmissionController, registry: Arc<CleanupRegistry>) -> Self {
        controller.set_active_registry(Some(registry.clone()));
        Self {
            controller,
            registry,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for ActiveSubmission<'_> {
    fn drop(&mut self) {
        self.registry.cancel_all();
        self.controller.set_active_registry(None);

        if !self.finished && !self.controller.context.is_cancelled() {
            *lock_state(&self.controller.state) = SubmissionState::Idle;
        }

        self.controller.busy.store(false, Ordering::Release);
    }
}
