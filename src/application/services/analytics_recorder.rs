//! Fire-and-forget click recording.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::domain::entities::ClickEvent;
use crate::domain::repositories::AnalyticsRepository;

/// Writes click events without holding up the response.
///
/// Each event is inserted by its own spawned task. The task owns its failure:
/// errors and timeouts are logged and counted, never retried and never
/// reported back to the request that produced the click. Clicks can be lost
/// while the store is unavailable.
#[derive(Clone)]
pub struct AnalyticsRecorder {
    repository: Arc<dyn AnalyticsRepository>,
    timeout: Duration,
}

impl AnalyticsRecorder {
    /// Creates a recorder whose inserts are abandoned after `timeout`.
    pub fn new(repository: Arc<dyn AnalyticsRepository>, timeout: Duration) -> Self {
        Self {
            repository,
            timeout,
        }
    }

    /// Schedules the insert and returns immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn record(&self, event: ClickEvent) {
        let repository = self.repository.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let deeplink_id = event.deeplink_id.clone();

            match tokio::time::timeout(timeout, repository.record_click(event)).await {
                Ok(Ok(())) => {
                    metrics::counter!("deeplink_clicks_recorded_total").increment(1);
                    debug!("Click recorded for deeplink {}", deeplink_id);
                }
                Ok(Err(e)) => {
                    metrics::counter!("deeplink_clicks_failed_total").increment(1);
                    error!("Deeplink analytics insert failed for {}: {}", deeplink_id, e);
                }
                Err(_) => {
                    metrics::counter!("deeplink_clicks_failed_total").increment(1);
                    warn!(
                        "Deeplink analytics insert for {} timed out after {:?}",
                        deeplink_id, timeout
                    );
                }
            }
        });
    }
}
