use std::sync::Arc;

use anyhow::Result;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};

use super::{FetchRequest, SampleFetcher};

/// The set of outstanding fetches. Completions arrive in whatever order the
/// network yields them.
#[derive(Default)]
pub struct FetchPool {
    running: FuturesUnordered<BoxFuture<'static, (FetchRequest, Result<Vec<f64>>)>>,
}

impl FetchPool {
    pub fn start_fetch(&mut self, request: FetchRequest, fetcher: Arc<dyn SampleFetcher>) {
        self.running.push(Box::pin(async move {
            let result = fetcher
                .fetch_range(&request.dataset, &request.column, request.from, request.to)
                .await;
            (request, result)
        }));
    }

    /// Resolves with the next completed fetch. Pends forever while the pool
    /// is empty, so it can sit in a `select!` arm.
    pub async fn fetched(&mut self) -> (FetchRequest, Result<Vec<f64>>) {
        match self.running.next().await {
            Some(completed) => completed,
            None => futures::future::pending().await,
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.running.len()
    }
}
