use fitcore::EvaluationResult;
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use tokio_util::sync::CancellationToken;

/// Latest successful evaluation, if any.
///
/// Results are shared behind `Arc` and only ever replaced as a whole.
#[derive(Clone, Default)]
pub struct ResultStore {
    current: Arc<RwLock<Option<Arc<EvaluationResult>>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, result: EvaluationResult) {
        *self.write() = Some(Arc::new(result));
    }

    /// Store `result` unless `context` is already cancelled, checked under the write lock
    pub fn set_unless_cancelled(
        &self,
        result: EvaluationResult,
        context: &CancellationToken,
    ) -> bool {
        let mut current = self.write();
        if context.is_cancelled() {
            return false;
        }
        *current = Some(Arc::new(result));
        true
    }

    pub fn clear(&self) {
        self.write().take();
    }

    pub fn get(&self) -> Option<Arc<EvaluationResult>> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.get().is_none()
    }

    /// Wait for any write in progress to finish
    pub(crate) fn barrier(&self) {
        drop(self.write());
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Arc<EvaluationResult>>> {
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
