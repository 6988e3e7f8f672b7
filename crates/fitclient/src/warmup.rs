use fitcore::ScoringService;
use std::sync::{Arc, Once};

static WARM_UP: Once = Once::new();

/// Ping the service in the background, at most once per process.
///
/// The outcome is only logged. Returns `true` if this call started the ping.
pub fn spawn_warm_up(service: Arc<dyn ScoringService>) -> bool {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::debug!("No async runtime available, skipping warm-up");
        return false;
    };

    let mut started = false;
    WARM_UP.call_once(|| {
        started = true;
        handle.spawn(async move {
            match service.warm_up().await {
                Ok(()) => tracing::debug!("Scoring service is awake"),
                Err(e) => tracing::debug!("Warm-up ping failed: {}", e),
            }
        });
    });
    started
}
