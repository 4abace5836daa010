//! Copy-on-write snapshot store shared by both catalogs
//!
//! A store owns one immutable snapshot behind an `Arc`. Readers clone the
//! `Arc` and never wait on a refresh; a refresh builds the replacement off to
//! the side and swaps it in only when the whole sheet parsed. Refreshes of one
//! store are single-flight: later callers queue on the gate.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::csv;
use super::source::TabularSource;
use crate::shutdown::ShutdownListener;

/// Data a store can publish
pub trait Snapshot: Default + Send + Sync + 'static {
    /// Name used in logs and errors
    const KIND: &'static str;

    /// Build a snapshot from data records (header already removed).
    ///
    /// Junk records are dropped, never reported.
    fn from_records(records: &[Vec<String>]) -> Self;

    /// Number of admitted rows or entries
    fn admitted(&self) -> usize;
}

/// Error type for a failed refresh. The previous snapshot stays published.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Failed to fetch {origin}: {message}")]
    Fetch { origin: String, message: String },

    #[error("Failed to read {}: {error}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("The {kind} source is empty: {reason}")]
    EmptySource {
        kind: &'static str,
        reason: &'static str,
    },

    #[error("The {kind} source is malformed: {error}")]
    Malformed {
        kind: &'static str,
        #[source]
        error: csv::CsvError,
    },

    #[error("Refresh cancelled")]
    Cancelled,

    #[error("Fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Outcome of a successful refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    pub kind: &'static str,
    pub admitted: usize,
}

pub struct SnapshotStore<S: Snapshot> {
    source: Arc<dyn TabularSource>,
    current: RwLock<Arc<S>>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl<S: Snapshot> SnapshotStore<S> {
    /// Create a store that publishes an empty snapshot until the first refresh
    pub fn new(source: Arc<dyn TabularSource>) -> Self {
        Self::preloaded(source, S::default())
    }

    /// Create a store that starts out publishing `snapshot`
    pub fn preloaded(source: Arc<dyn TabularSource>, snapshot: S) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(snapshot)),
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Current snapshot. Never touches the source.
    pub fn get(&self) -> Arc<S> {
        Arc::clone(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn describe_source(&self) -> String {
        self.source.describe()
    }

    /// Re-fetch the sheet and publish it if it parses completely
    pub async fn refresh(&self, shutdown: &ShutdownListener) -> Result<RefreshReport, RefreshError> {
        let _in_flight = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return Err(RefreshError::Cancelled),
            guard = self.refresh_gate.lock() => guard,
        };

        let text = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return Err(RefreshError::Cancelled),
            fetched = self.source.fetch() => fetched?,
        };

        let snapshot = Self::parse(&text)?;
        let report = RefreshReport {
            kind: S::KIND,
            admitted: snapshot.admitted(),
        };
        self.publish(snapshot);
        Ok(report)
    }

    fn parse(text: &str) -> Result<S, RefreshError> {
        let records = csv::parse_records(text)
            .map_err(|error| RefreshError::Malformed { kind: S::KIND, error })?;
        let Some((_header, rows)) = records.split_first() else {
            return Err(RefreshError::EmptySource {
                kind: S::KIND,
                reason: "no header record",
            });
        };

        let snapshot = S::from_records(rows);
        debug!(
            kind = S::KIND,
            records = rows.len(),
            admitted = snapshot.admitted(),
            "Parsed sheet"
        );
        if snapshot.admitted() == 0 {
            return Err(RefreshError::EmptySource {
                kind: S::KIND,
                reason: "no usable rows",
            });
        }
        Ok(snapshot)
    }

    fn publish(&self, snapshot: S) {
        let next = Arc::new(snapshot);
        let previous = std::mem::replace(
            &mut *self.current.write().unwrap_or_else(|e| e.into_inner()),
            next,
        );
        // Readers may still hold the old snapshot; it is freed with the last clone
        drop(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::source::StaticSource;
    use crate::shutdown::Shutdown;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Snapshot that keeps the first cell of every record
    #[derive(Debug, Default, PartialEq)]
    struct Cells(Vec<String>);

    impl Snapshot for Cells {
        const KIND: &'static str = "test sheet";

        fn from_records(records: &[Vec<String>]) -> Self {
            Cells(
                records
                    .iter()
                    .filter_map(|r| r.first().filter(|c| !c.is_empty()).cloned())
                    .collect(),
            )
        }

        fn admitted(&self) -> usize {
            self.0.len()
        }
    }

    /// Source that blocks every fetch until released
    struct GatedSource {
        body: String,
        started: Notify,
        release: Notify,
    }

    impl GatedSource {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
                started: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl TabularSource for GatedSource {
        fn describe(&self) -> String {
            "gated".to_string()
        }

        async fn fetch(&self) -> Result<String, RefreshError> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(self.body.clone())
        }
    }

    fn cells(values: &[&str]) -> Cells {
        Cells(values.iter().map(|v| v.to_string()).collect())
    }

    #[tokio::test]
    async fn refresh_publishes_parsed_snapshot() {
        let store: SnapshotStore<Cells> =
            SnapshotStore::new(Arc::new(StaticSource::new("head\na\nb\n")));
        assert_eq!(store.get().admitted(), 0);

        let report = store.refresh(&ShutdownListener::never()).await.unwrap();

        assert_eq!(report.admitted, 2);
        assert_eq!(report.kind, "test sheet");
        assert_eq!(*store.get(), cells(&["a", "b"]));
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let source = Arc::new(StaticSource::new("head\na\n"));
        let store: SnapshotStore<Cells> = SnapshotStore::new(source.clone());
        store.refresh(&ShutdownListener::never()).await.unwrap();

        source.fail();
        let err = store.refresh(&ShutdownListener::never()).await.unwrap_err();
        assert!(matches!(err, RefreshError::Fetch { .. }));
        assert_eq!(*store.get(), cells(&["a"]));

        source.set("");
        let err = store.refresh(&ShutdownListener::never()).await.unwrap_err();
        assert!(matches!(err, RefreshError::EmptySource { reason: "no header record", .. }));

        source.set("head only\n");
        let err = store.refresh(&ShutdownListener::never()).await.unwrap_err();
        assert!(matches!(err, RefreshError::EmptySource { reason: "no usable rows", .. }));

        source.set("head\nb\n\"c\nd\n");
        let err = store.refresh(&ShutdownListener::never()).await.unwrap_err();
        assert!(matches!(err, RefreshError::Malformed { .. }));

        assert_eq!(*store.get(), cells(&["a"]));
    }

    #[tokio::test]
    async fn stray_quote_in_a_title_keeps_every_row() {
        let source = Arc::new(StaticSource::new("head,title\n1,24\" screen\n2,x\n3,y\n"));
        let store: SnapshotStore<Cells> = SnapshotStore::new(source);

        let report = store.refresh(&ShutdownListener::never()).await.unwrap();

        assert_eq!(report.admitted, 3);
        assert_eq!(*store.get(), cells(&["1", "2", "3"]));
    }

    #[tokio::test]
    async fn readers_see_old_snapshot_while_refresh_is_in_flight() {
        let source = Arc::new(GatedSource::new("head\nx\ny\nz\n"));
        let store: Arc<SnapshotStore<Cells>> =
            Arc::new(SnapshotStore::preloaded(source.clone(), cells(&["old"])));

        let refreshing = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.refresh(&ShutdownListener::never()).await })
        };
        source.started.notified().await;

        // Refresh is parked inside fetch; reads must not wait for it
        let during = tokio::time::timeout(Duration::from_millis(100), async { store.get() })
            .await
            .expect("get() must not block");
        assert_eq!(*during, cells(&["old"]));

        source.release.notify_one();
        refreshing.await.unwrap().unwrap();

        assert_eq!(*store.get(), cells(&["x", "y", "z"]));
        // The snapshot handed out earlier is untouched by the swap
        assert_eq!(*during, cells(&["old"]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_readers_never_observe_a_mixed_snapshot() {
        let source = Arc::new(StaticSource::new("head\nn1\nn2\nn3\nn4\n"));
        let store: Arc<SnapshotStore<Cells>> =
            Arc::new(SnapshotStore::preloaded(source.clone(), cells(&["o1", "o2"])));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    for _ in 0..500 {
                        let snap = store.get();
                        let old = *snap == cells(&["o1", "o2"]);
                        let new = *snap == cells(&["n1", "n2", "n3", "n4"]);
                        assert!(old || new, "mixed snapshot: {:?}", snap);
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for _ in 0..20 {
            store.refresh(&ShutdownListener::never()).await.unwrap();
        }
        for reader in readers {
            reader.await.unwrap();
        }
    }

    #[tokio::test]
    async fn cancelled_refresh_abandons_fetch_and_keeps_snapshot() {
        let source = Arc::new(GatedSource::new("head\nnew\n"));
        let store: Arc<SnapshotStore<Cells>> =
            Arc::new(SnapshotStore::preloaded(source.clone(), cells(&["old"])));
        let shutdown = Shutdown::new();

        let refreshing = {
            let store = Arc::clone(&store);
            let listener = shutdown.listener();
            tokio::spawn(async move { store.refresh(&listener).await })
        };
        source.started.notified().await;
        shutdown.trigger();

        let result = refreshing.await.unwrap();
        assert!(matches!(result, Err(RefreshError::Cancelled)));
        assert_eq!(*store.get(), cells(&["old"]));
    }

    #[tokio::test]
    async fn refreshes_of_one_store_are_single_flight() {
        let source = Arc::new(GatedSource::new("head\nv\n"));
        let store: Arc<SnapshotStore<Cells>> = Arc::new(SnapshotStore::new(source.clone()));

        let first = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.refresh(&ShutdownListener::never()).await })
        };
        source.started.notified().await;

        let second = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.refresh(&ShutdownListener::never()).await })
        };

        // The second refresh is queued on the gate and never reaches fetch
        let second_started =
            tokio::time::timeout(Duration::from_millis(100), source.started.notified()).await;
        assert!(second_started.is_err());

        source.release.notify_one();
        first.await.unwrap().unwrap();

        source.started.notified().await;
        source.release.notify_one();
        second.await.unwrap().unwrap();
        assert_eq!(*store.get(), cells(&["v"]));
    }
}
