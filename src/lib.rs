//! Sparse interval cache for time-series sample data.
//!
//! Tracks which sample-index sub-ranges of dataset columns have already been
//! fetched, merges overlapping and adjacent ranges, computes the missing
//! complement of a query, and stitches the covered pieces back into
//! plot-ready series with gap sentinels. [`GraphAssembler`] drives the whole
//! cycle: diff the desired ranges against the cache, fetch what is missing
//! through a [`SampleFetcher`], and publish assembled series as data arrives.

pub mod assembler;
pub mod cache;
pub mod error;
pub mod fetch;
pub mod types;
pub mod util;

pub use assembler::GraphAssembler;
pub use cache::{DatasetCache, Interval, IntervalSet, RequestTracker};
pub use error::CacheError;
pub use fetch::{FetchRequest, HttpSampleFetcher, SampleFetcher};
pub use types::{ColumnId, DatasetId, GraphUpdate, Series, SeriesRequest};
