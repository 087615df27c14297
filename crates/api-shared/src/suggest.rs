//! Deadline-bounded triage suggestion shared by the REST and gRPC APIs.
//!
//! The rule engine is pure and runs inline. The history read is the only I/O and runs on the
//! blocking pool under a deadline; when it is late or fails, the request is answered from the
//! rules alone. A late read keeps its blocking thread until the store returns, so the number of
//! reads still running is capped.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use triage_core::service::today;
use triage_core::{combine, HistorySuggestion, TriageInput, TriageResult, TriageService};

/// Default cap on history reads running on the blocking pool.
pub const DEFAULT_MAX_IN_FLIGHT_READS: usize = 32;

/// Bounds every history read by a deadline and caps the reads in flight.
#[derive(Clone, Debug)]
pub struct HistoryGate {
    deadline: Duration,
    capacity: usize,
    permits: Arc<Semaphore>,
}

impl HistoryGate {
    pub fn new(deadline: Duration) -> Self {
        Self::with_capacity(deadline, DEFAULT_MAX_IN_FLIGHT_READS)
    }

    /// Gate allowing at most `max_in_flight` concurrent reads (at least one).
    pub fn with_capacity(deadline: Duration, max_in_flight: usize) -> Self {
        let capacity = max_in_flight.max(1);
        Self {
            deadline,
            capacity,
            permits: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Suggests a priority, giving the history store at most the gate's deadline to answer.
    pub async fn suggest(&self, service: &TriageService, input: &TriageInput) -> TriageResult {
        let rule_based = service.evaluate_rules(input, today());
        let history_based = self.read_history(service, input.motive()).await;
        combine(rule_based, history_based)
    }

    async fn read_history(&self, service: &TriageService, motive: &str) -> HistorySuggestion {
        let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
            tracing::warn!(
                "{} history reads still running, using rules only",
                self.capacity
            );
            return HistorySuggestion::empty();
        };

        let svc = service.clone();
        let motive = motive.to_string();
        let read = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            svc.suggest_from_history(&motive)
        });

        match tokio::time::timeout(self.deadline, read).await {
            Ok(Ok(Ok(suggestion))) => suggestion,
            Ok(Ok(Err(e))) => {
                tracing::warn!("history suggestion unavailable, using rules only: {}", e);
                HistorySuggestion::empty()
            }
            Ok(Err(e)) => {
                tracing::error!("history suggestion task failed: {:?}", e);
                HistorySuggestion::empty()
            }
            Err(_) => {
                tracing::warn!(
                    "history suggestion exceeded {}ms, using rules only",
                    self.deadline.as_millis()
                );
                HistorySuggestion::empty()
            }
        }
    }
}
