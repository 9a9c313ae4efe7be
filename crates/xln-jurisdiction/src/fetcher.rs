use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};

use crate::error::FetchError;
use crate::source::{InsuranceLine, Jurisdiction};
use crate::tracker::{FetchTicket, InsuranceTracker, InsuranceView};

/// Drives insurance requests for the selected entity on the Tokio runtime.
///
/// Selecting a new entity aborts the superseded request; if that request had
/// already produced a result, the tracker still refuses it because its ticket
/// is stale. Failures are recorded once and never retried on their own.
pub struct InsuranceFetcher {
    jurisdiction: Arc<dyn Jurisdiction>,
    tracker: Arc<Mutex<InsuranceTracker>>,
    inflight: Mutex<Option<AbortHandle>>,
    timeout: Option<Duration>,
}

impl InsuranceFetcher {
    pub fn new(jurisdiction: Arc<dyn Jurisdiction>) -> Self {
        Self {
            jurisdiction,
            tracker: Arc::new(Mutex::new(InsuranceTracker::new())),
            inflight: Mutex::new(None),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn view(&self) -> InsuranceView {
        self.tracker.lock().unwrap().view().clone()
    }

    /// Selects `entity_id` and starts its request. Returns the spawned task,
    /// or `None` when the jurisdiction has no insurance feature. Must be
    /// called from within a Tokio runtime.
    pub fn select(&self, entity_id: &str) -> Option<JoinHandle<()>> {
        let ticket = self.tracker.lock().unwrap().select(entity_id);
        self.start(ticket)
    }

    /// Re-issues the request for the current selection.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        let ticket = self.tracker.lock().unwrap().refresh()?;
        self.start(ticket)
    }

    pub fn clear(&self) {
        self.tracker.lock().unwrap().clear();
        self.abort_inflight();
    }

    /// Selects `entity_id` and waits for its outcome.
    pub async fn fetch(&self, entity_id: &str) -> InsuranceView {
        if let Some(handle) = self.select(entity_id) {
            if let Err(err) = handle.await {
                tracing::debug!(entity_id, "insurance task ended early: {err}");
            }
        }
        self.view()
    }

    fn start(&self, ticket: FetchTicket) -> Option<JoinHandle<()>> {
        self.abort_inflight();

        let Some(source) = self.jurisdiction.insurance() else {
            tracing::debug!(
                jurisdiction = self.jurisdiction.name(),
                "insurance not supported"
            );
            self.tracker.lock().unwrap().commit_unavailable(&ticket);
            return None;
        };

        let tracker = self.tracker.clone();
        let timeout = self.timeout;
        let handle = tokio::spawn(async move {
            let entity_id = ticket.entity_id().to_string();
            let request = source.insurance_lines(&entity_id);
            let result: Result<Vec<InsuranceLine>, FetchError> = match timeout {
                Some(limit) => match tokio::time::timeout(limit, request).await {
                    Ok(result) => result.map_err(FetchError::from),
                    Err(_) => Err(FetchError::Timeout(limit)),
                },
                None => request.await.map_err(FetchError::from),
            };

            if let Err(err) = &result {
                tracing::warn!(entity_id = %entity_id, "{err}");
            }
            let committed = tracker.lock().unwrap().commit(&ticket, result);
            if !committed {
                tracing::debug!(
                    entity_id = %entity_id,
                    generation = ticket.generation(),
                    "discarding stale insurance response"
                );
            }
        });

        *self.inflight.lock().unwrap() = Some(handle.abort_handle());
        Some(handle)
    }

    fn abort_inflight(&self) {
        if let Some(previous) = self.inflight.lock().unwrap().take() {
            previous.abort();
        }
    }
}

impl std::fmt::Debug for InsuranceFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsuranceFetcher")
            .field("jurisdiction", &self.jurisdiction.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
