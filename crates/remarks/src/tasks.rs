//! Detached background work with its own deadline.
//!
//! Cache backfills and feed events must not hold up the request that caused
//! them, but they must not pile up without bound either. Jobs run on the tokio
//! runtime under a semaphore; when every permit is taken the job is dropped
//! and logged instead of queued.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Spawner for fire-and-forget jobs.
#[derive(Debug, Clone)]
pub struct BackgroundTasks {
    permits: Arc<Semaphore>,
}

impl BackgroundTasks {
    /// Creates a spawner allowing at most `max_inflight` concurrent jobs.
    pub fn new(max_inflight: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_inflight.max(1))),
        }
    }

    /// Runs `job` detached from the caller, cancelling it after `deadline`.
    ///
    /// Returns `None` when the job was dropped because too many are in flight.
    /// The handle is only useful to tests; production callers ignore it.
    pub fn submit<F>(&self, label: &'static str, deadline: Duration, job: F) -> Option<JoinHandle<()>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let permit = match self.permits.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                tracing::warn!(task = label, "Background task dropped, too many in flight");
                return None;
            }
        };

        Some(tokio::spawn(async move {
            let _permit = permit;
            if tokio::time::timeout(deadline, job).await.is_err() {
                tracing::warn!(
                    task = label,
                    deadline_ms = deadline.as_millis() as u64,
                    "Background task timed out"
                );
            }
        }))
    }

    /// Number of jobs that could start right now.
    #[cfg(test)]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new(256)
    }
}
