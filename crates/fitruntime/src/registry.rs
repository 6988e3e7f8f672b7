use std::sync::{Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Tracks the delayed actions of one submission.
///
/// Every action must observe `token()` before touching shared state;
/// `cancel_all` cancels the token and aborts whatever has not fired yet.
/// Dropping the registry cancels it as well.
pub struct CleanupRegistry {
    token: CancellationToken,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::with_token(CancellationToken::new())
    }

    /// Registry that is also cancelled when `parent` is
    pub fn with_parent(parent: &CancellationToken) -> Self {
        Self::with_token(parent.child_token())
    }

    fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Record a pending delayed action.
    ///
    /// Registering on a cancelled registry aborts the action immediately.
    pub fn register(&self, action: JoinHandle<()>) {
        let mut pending = self.lock();
        if self.token.is_cancelled() {
            action.abort();
            return;
        }
        pending.retain(|handle| !handle.is_finished());
        pending.push(action);
    }

    /// Number of registered actions that have not fired yet
    pub fn pending(&self) -> usize {
        let mut pending = self.lock();
        pending.retain(|handle| !handle.is_finished());
        pending.len()
    }

    /// Invalidate every action that has not fired. Returns how many were still pending.
    pub fn cancel_all(&self) -> usize {
        let mut pending = self.lock();
        self.token.cancel();

        let mut cancelled = 0;
        for handle in pending.drain(..) {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }
        cancelled
    }

    fn lock(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for CleanupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CleanupRegistry {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
