use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, info};
use uuid::Uuid;

use cloud_auditor_core::{AppError, AppResult};

use crate::AuditOrchestrator;

/// Full scan request accepted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanJob {
    /// Correlation id used in scan logs.
    pub scan_id: Uuid,
}

/// Queue through which full scans run detached from their trigger.
///
/// A single worker task drains the queue, so scans never share a store
/// session.
#[derive(Clone)]
pub struct ScanDispatcher {
    sender: mpsc::Sender<ScanJob>,
}

impl ScanDispatcher {
    /// Starts the scan worker on the current runtime and returns its queue.
    #[must_use]
    pub fn spawn(orchestrator: AuditOrchestrator, queue_capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));
        tokio::spawn(run_scan_worker(orchestrator, receiver));

        Self { sender }
    }

    /// Enqueues a full scan without waiting for it to run.
    pub fn submit(&self) -> AppResult<ScanJob> {
        let job = ScanJob {
            scan_id: Uuid::new_v4(),
        };

        self.sender.try_send(job).map_err(|error| match error {
            TrySendError::Full(_) => {
                AppError::Conflict("full scan backlog is full, try again later".to_owned())
            }
            TrySendError::Closed(_) => {
                AppError::Internal("full scan worker is not running".to_owned())
            }
        })?;

        info!(scan_id = %job.scan_id, "full scan queued");
        Ok(job)
    }
}

async fn run_scan_worker(orchestrator: AuditOrchestrator, mut receiver: mpsc::Receiver<ScanJob>) {
    info!("full scan worker started");

    while let Some(job) = receiver.recv().await {
        if let Err(scan_error) = orchestrator.run_full_scan(job.scan_id).await {
            error!(scan_id = %job.scan_id, error = %scan_error, "full scan aborted");
        }
    }

    info!("full scan worker stopped");
}
