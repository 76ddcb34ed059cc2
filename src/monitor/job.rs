//! Job Controller
//!
//! Owns the lifecycle of one detection run: Idle -> Running ->
//! (CancelRequested) -> Idle. At most one run is in flight at a time; a
//! second `start` fails fast without touching the network. State always
//! returns to Idle when the run resolves, including on error, via a drop
//! guard.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::backend::types::DetectionRunResult;
use crate::error::{MonitorError, MonitorResult};

/// Detection run lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Running,
    /// Cancellation was requested; the backend will still return a partial
    /// result, which the controller accepts like any other completion.
    CancelRequested,
}

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_CANCEL_REQUESTED: u8 = 2;

fn decode_state(raw: u8) -> JobState {
    match raw {
        STATE_RUNNING => JobState::Running,
        STATE_CANCEL_REQUESTED => JobState::CancelRequested,
        _ => JobState::Idle,
    }
}

/// The two backend operations a detection run needs. `BackendClient`
/// implements this over HTTP; tests substitute a mock.
#[allow(async_fn_in_trait)]
pub trait DetectionBackend: Send + Sync {
    async fn run_detection(&self, limit: Option<u64>) -> MonitorResult<DetectionRunResult>;
    async fn cancel_detection(&self) -> MonitorResult<()>;
}

/// Drives one detection run at a time against a [`DetectionBackend`]
pub struct JobController<B> {
    backend: Arc<B>,
    state: Arc<AtomicU8>,
}

impl<B> Clone for JobController<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            state: Arc::clone(&self.state),
        }
    }
}

impl<B: DetectionBackend> JobController<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            state: Arc::new(AtomicU8::new(STATE_IDLE)),
        }
    }

    pub fn state(&self) -> JobState {
        decode_state(self.state.load(Ordering::SeqCst))
    }

    /// Start a detection run. `limit` caps how many stored logs are analyzed;
    /// `None` means all. Fails with [`MonitorError::DetectionBusy`] without a
    /// network call if a run is already in flight.
    pub async fn start(&self, limit: Option<u64>) -> MonitorResult<DetectionRunResult> {
        if self
            .state
            .compare_exchange(STATE_IDLE, STATE_RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(MonitorError::DetectionBusy);
        }

        // Resets to Idle on every exit path, error paths included
        let _guard = RunGuard {
            state: Arc::clone(&self.state),
        };

        let result = self.backend.run_detection(limit).await?;

        if result.cancelled {
            log::info!(
                "Detection run cancelled after {}/{} logs",
                result.analyzed_count,
                result.total_logs
            );
        } else {
            log::info!(
                "Detection run complete: {} of {} logs analyzed",
                result.analyzed_count,
                result.total_logs
            );
        }

        Ok(result)
    }

    /// Request cancellation of the in-flight run. Cooperative: the backend
    /// finishes work up to the cancellation point and the pending `start`
    /// call still resolves with the partial result. A no-op when nothing is
    /// running.
    pub async fn cancel(&self) -> MonitorResult<()> {
        if self
            .state
            .compare_exchange(
                STATE_RUNNING,
                STATE_CANCEL_REQUESTED,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_err()
        {
            log::debug!("Cancel ignored: no detection run in flight");
            return Ok(());
        }

        log::info!("Requesting cancellation of detection run");
        self.backend.cancel_detection().await
    }
}

struct RunGuard {
    state: Arc<AtomicU8>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.state.store(STATE_IDLE, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingBackend;

    impl DetectionBackend for FailingBackend {
        async fn run_detection(&self, _limit: Option<u64>) -> MonitorResult<DetectionRunResult> {
            Err(MonitorError::Http { status: 500 })
        }

        async fn cancel_detection(&self) -> MonitorResult<()> {
            Ok(())
        }
    }

    struct QuickBackend;

    impl DetectionBackend for QuickBackend {
        async fn run_detection(&self, limit: Option<u64>) -> MonitorResult<DetectionRunResult> {
            let n = limit.unwrap_or(3) as usize;
            Ok(DetectionRunResult {
                analyzed_events: vec![],
                analyzed_count: n,
                total_logs: n,
                cancelled: false,
            })
        }

        async fn cancel_detection(&self) -> MonitorResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_run_resets_state_to_idle() {
        let job = JobController::new(Arc::new(FailingBackend));

        let outcome = job.start(None).await;
        assert!(matches!(outcome, Err(MonitorError::Http { status: 500 })));
        assert_eq!(job.state(), JobState::Idle);

        // Controller is usable again after the failure
        assert!(matches!(
            job.start(None).await,
            Err(MonitorError::Http { .. })
        ));
    }

    #[tokio::test]
    async fn successful_run_resets_state_to_idle() {
        let job = JobController::new(Arc::new(QuickBackend));

        let result = job.start(Some(7)).await.unwrap();
        assert_eq!(result.analyzed_count, 7);
        assert_eq!(job.state(), JobState::Idle);
    }

    #[tokio::test]
    async fn cancel_without_run_is_a_no_op() {
        let job = JobController::new(Arc::new(QuickBackend));

        job.cancel().await.unwrap();
        assert_eq!(job.state(), JobState::Idle);
    }
}
