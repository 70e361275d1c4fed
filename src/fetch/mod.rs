use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ColumnId, DatasetId};

pub mod http;
pub mod pool;

pub use http::HttpSampleFetcher;
pub use pool::FetchPool;

/// The network collaborator: retrieves decoded samples for exactly the
/// requested half-open index range of one column. The wire format is the
/// implementation's concern.
#[async_trait]
pub trait SampleFetcher: Send + Sync + 'static {
    async fn fetch_range(
        &self,
        dataset: &DatasetId,
        column: &ColumnId,
        from: u64,
        to: u64,
    ) -> Result<Vec<f64>>;
}

/// One sub-range to retrieve for a (dataset, column) pair.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub dataset: DatasetId,
    pub column: ColumnId,
    pub from: u64,
    pub to: u64,
}

impl FetchRequest {
    pub fn len(&self) -> u64 {
        self.to - self.from
    }
}

impl std::fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}[{}..{})",
            self.dataset, self.column, self.from, self.to
        )
    }
}

impl std::fmt::Debug for FetchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}
