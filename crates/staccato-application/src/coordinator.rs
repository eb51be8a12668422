// SPDX-License-Identifier: GPL-3.0-or-later
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use staccato_catalog::{CatalogError, CatalogSearcher, SearchResult};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// What the list screen renders right now.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchSnapshot {
    /// No query entered yet, or the query was cleared.
    #[default]
    Idle,
    /// A chain for `query` is in flight.
    Pending { query: String },
    /// The most recent chain finished; `result` is current for `query`.
    Ready { query: String, result: SearchResult },
    /// The most recent chain failed. Any earlier result is stale and has
    /// been dropped rather than left on screen as current.
    Failed { query: String, error: String },
}

/// Navigation payload handed to the detail screen when a result row is
/// selected. Owned by the caller; nothing about the selection lives in
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistSelection {
    pub name: String,
    /// First image URL of the artist, if any.
    pub image_url: Option<String>,
    pub follower_count: u64,
}

/// Sequences authenticate-then-search chains on behalf of the UI.
///
/// Every text change issues a new chain tagged with a monotonically
/// increasing sequence number. A completion is applied only while its number
/// is still the highest handed out, so the displayed result always belongs
/// to the newest keystroke regardless of network timing. The superseded
/// in-flight chain is also aborted outright; the guard alone is sufficient
/// for correctness, the abort just stops wasted work.
pub struct SearchCoordinator<S> {
    inner: Arc<CoordinatorInner<S>>,
}

impl<S> Clone for SearchCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct CoordinatorInner<S> {
    searcher: S,
    issued: AtomicU64,
    /// Sequence number of the snapshot currently published. Guarded by a
    /// mutex so the compare and the send are one step.
    applied: Mutex<u64>,
    inflight: Mutex<Option<JoinHandle<()>>>,
    snapshot_tx: watch::Sender<SearchSnapshot>,
}

impl<S> SearchCoordinator<S>
where
    S: CatalogSearcher + 'static,
{
    pub fn new(searcher: S) -> Self {
        let (snapshot_tx, _) = watch::channel(SearchSnapshot::Idle);
        Self {
            inner: Arc::new(CoordinatorInner {
                searcher,
                issued: AtomicU64::new(0),
                applied: Mutex::new(0),
                inflight: Mutex::new(None),
                snapshot_tx,
            }),
        }
    }

    /// Entry point for the search box: call on every text change.
    ///
    /// Blank input resets the snapshot to [`SearchSnapshot::Idle`]. Anything
    /// else publishes `Pending` and spawns a fresh authenticate-then-search
    /// chain.
    pub fn on_query_changed(&self, text: &str) {
        let query = text.trim().to_string();

        // The previous chain is superseded either way.
        if let Some(handle) = self
            .inner
            .inflight
            .lock()
            .expect("inflight lock poisoned")
            .take()
        {
            handle.abort();
        }

        let seq = self.inner.issued.fetch_add(1, Ordering::AcqRel) + 1;

        if query.is_empty() {
            self.inner.apply(seq, SearchSnapshot::Idle);
            return;
        }

        self.inner.apply(
            seq,
            SearchSnapshot::Pending {
                query: query.clone(),
            },
        );

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let outcome = inner.searcher.search_artists(&query).await;
            inner.complete(seq, query, outcome);
        });

        *self
            .inner
            .inflight
            .lock()
            .expect("inflight lock poisoned") = Some(handle);
    }

    /// Latest applied snapshot, for pull-style rendering.
    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    /// Watch receiver for push-style rendering.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Selection event: the payload the detail screen needs, if `index`
    /// points at a currently displayed artist.
    pub fn select(&self, index: usize) -> Option<ArtistSelection> {
        match self.snapshot() {
            SearchSnapshot::Ready { result, .. } => {
                result.artists.get(index).map(|artist| ArtistSelection {
                    name: artist.name.clone(),
                    image_url: artist.thumbnail_url().map(str::to_string),
                    follower_count: artist.follower_count,
                })
            }
            _ => None,
        }
    }
}

impl<S> CoordinatorInner<S> {
    /// Publish `snapshot` unless a newer chain already published.
    fn apply(&self, seq: u64, snapshot: SearchSnapshot) -> bool {
        let mut applied = self.applied.lock().expect("applied lock poisoned");
        if seq < *applied {
            trace!(
                target: "coordinator",
                "discarding stale completion (seq {} < {})",
                seq,
                *applied
            );
            return false;
        }
        *applied = seq;
        self.snapshot_tx.send_replace(snapshot);
        true
    }

    fn complete(&self, seq: u64, query: String, outcome: Result<Option<SearchResult>, CatalogError>) {
        match outcome {
            Ok(Some(result)) => {
                debug!(
                    target: "coordinator",
                    "search for {:?} returned {} artists",
                    query,
                    result.len()
                );
                self.apply(seq, SearchSnapshot::Ready { query, result });
            }
            // Precondition no-op (blank query or empty credential): nothing
            // to display, nothing to report.
            Ok(None) => {}
            Err(error) => {
                debug!(target: "coordinator", "search for {:?} failed: {}", query, error);
                self.apply(
                    seq,
                    SearchSnapshot::Failed {
                        query,
                        error: error.to_string(),
                    },
                );
            }
        }
    }
}
