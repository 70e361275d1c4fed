use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::CacheError;
use crate::fetch::{FetchPool, SampleFetcher};
use crate::types::{GraphUpdate, SeriesRequest};

pub mod series;
pub mod state;

use state::{State, UpdateStatus};

/// Owns the session-scoped caches and drives the diff → fetch → assemble
/// loop for one chart. All mutation goes through the internal mutex, so
/// fetch completions arriving in any order are safe.
pub struct GraphAssembler {
    fetcher: Arc<dyn SampleFetcher>,
    state: Mutex<State>,
    notify: tokio::sync::Notify,
    updates_tx: watch::Sender<GraphUpdate>,
}

impl GraphAssembler {
    pub fn new(fetcher: Arc<dyn SampleFetcher>) -> Self {
        let (updates_tx, _) = watch::channel(GraphUpdate::default());
        Self {
            fetcher,
            state: Mutex::new(State::default()),
            notify: tokio::sync::Notify::new(),
            updates_tx,
        }
    }

    /// Replaces the full set of desired series and wakes the run loop.
    /// Invalid ranges are rejected synchronously with no state touched.
    #[instrument(skip_all)]
    pub fn set_desired_ranges(&self, requests: Vec<SeriesRequest>) -> Result<(), CacheError> {
        for request in &requests {
            request.validate()?;
        }
        match self.state.lock().set_desired(requests) {
            UpdateStatus::Unchanged => {}
            UpdateStatus::Updated => {
                info!("Desired ranges changed");
                self.notify.notify_one();
            }
        }
        Ok(())
    }

    /// A receiver of assembly snapshots; only the latest value is retained.
    pub fn subscribe(&self) -> watch::Receiver<GraphUpdate> {
        self.updates_tx.subscribe()
    }

    /// The event loop: wakes on desired-set changes and fetch completions,
    /// keeps up to `concurrency` fetches outstanding and publishes an
    /// assembly snapshot after every pass.
    pub async fn run(&self, cancellation_token: CancellationToken, concurrency: usize) {
        let mut pool = FetchPool::default();
        loop {
            self.state.lock().report_status();

            tokio::select! {
                _ = self.notify.notified() => {}
                (request, result) = pool.fetched() => {
                    let values = match result {
                        Ok(values) if values.len() as u64 == request.len() => Some(values),
                        Ok(values) => {
                            warn!(
                                "Fetch for {request} returned {} samples, expected {}",
                                values.len(),
                                request.len()
                            );
                            None
                        }
                        Err(e) => {
                            warn!("Failed to fetch {request}:\n{e:?}");
                            None
                        }
                    };
                    self.state.lock().complete_fetch(&request, values);
                }
                _ = cancellation_token.cancelled() => { break }
            }

            while pool.fetch_count() < concurrency {
                if let Some(request) = self.state.lock().take_next_fetch() {
                    debug!("Fetching {request}");
                    pool.start_fetch(request, self.fetcher.clone());
                } else {
                    break;
                }
            }

            let update = self.state.lock().assemble();
            self.updates_tx.send_replace(update);
        }
    }
}
