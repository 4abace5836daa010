//! Periodic catalog refresh
//!
//! Each store gets its own task: one refresh at startup, then one per
//! interval until shutdown. A failed refresh is logged and retried on the
//! next tick; the published snapshot is left alone.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::catalog::{RefreshError, RefreshReport, Snapshot, SnapshotStore};
use crate::shutdown::{Shutdown, ShutdownListener};

/// Owns the refresh tasks and the signal that stops them
pub struct RefreshScheduler {
    shutdown: Shutdown,
    tasks: Vec<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self {
            shutdown: Shutdown::new(),
            tasks: Vec::new(),
        }
    }

    /// Start refreshing `store` now and then every `interval`
    pub fn spawn<S: Snapshot>(&mut self, store: Arc<SnapshotStore<S>>, interval: Duration) {
        info!(
            kind = S::KIND,
            source = %store.describe_source(),
            interval_secs = interval.as_secs(),
            "Starting catalog refresh"
        );
        let listener = self.shutdown.listener();
        self.tasks
            .push(tokio::spawn(run_refresh_loop(store, interval, listener)));
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Stop every loop and wait for them to exit. In-flight fetches are abandoned.
    pub async fn shutdown(self) {
        info!("Stopping catalog refresh");
        self.shutdown.trigger();
        for result in join_all(self.tasks).await {
            if let Err(e) = result {
                warn!("Refresh task ended abnormally: {}", e);
            }
        }
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Refresh `store` once and log the outcome
pub async fn refresh_once<S: Snapshot>(
    store: &SnapshotStore<S>,
    shutdown: &ShutdownListener,
) -> Result<RefreshReport, RefreshError> {
    let result = store.refresh(shutdown).await;
    match &result {
        Ok(report) => info!("{} refreshed: {} entries", report.kind, report.admitted),
        Err(RefreshError::Cancelled) => debug!("{} refresh cancelled", S::KIND),
        Err(e) => warn!("{} refresh failed: {}", S::KIND, e),
    }
    result
}

async fn run_refresh_loop<S: Snapshot>(
    store: Arc<SnapshotStore<S>>,
    interval: Duration,
    shutdown: ShutdownListener,
) {
    let _ = refresh_once(&*store, &shutdown).await;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {
                let _ = refresh_once(&*store, &shutdown).await;
            }
        }
    }

    debug!("{} refresh loop stopped", S::KIND);
}
