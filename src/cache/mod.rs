use std::collections::HashMap;

use crate::types::{ColumnId, DatasetId};

pub mod interval;
pub mod interval_set;

pub use interval::Interval;
pub use interval_set::IntervalSet;

/// Sample data known for one dataset, one `IntervalSet` per column.
#[derive(Debug, Default)]
pub struct DatasetCache {
    columns: HashMap<ColumnId, IntervalSet>,
}

impl DatasetCache {
    pub fn get_or_create(&mut self, column: &ColumnId) -> &mut IntervalSet {
        self.columns.entry(column.clone()).or_default()
    }

    pub fn record(&mut self, column: &ColumnId, interval: Interval) {
        self.get_or_create(column).insert(interval);
    }

    pub fn missing(&self, column: &ColumnId, from: u64, to: u64) -> Vec<(u64, u64)> {
        match self.columns.get(column) {
            Some(set) => set.missing_ranges(from, to),
            None if from < to => vec![(from, to)],
            None => vec![],
        }
    }

    pub fn extract(&self, column: &ColumnId, from: u64, to: u64) -> Vec<Interval> {
        self.columns
            .get(column)
            .map(|set| set.extract(from, to))
            .unwrap_or_default()
    }
}

/// Ranges already requested from the server (in flight or fulfilled) for one
/// dataset. Presence means "requested", not "data available"; it is consulted
/// before the data cache so an in-flight range is never fetched twice.
#[derive(Debug, Default)]
pub struct RequestTracker {
    columns: HashMap<ColumnId, IntervalSet>,
}

impl RequestTracker {
    pub fn mark(&mut self, column: &ColumnId, from: u64, to: u64) {
        self.columns
            .entry(column.clone())
            .or_default()
            .insert(Interval::span(from, to));
    }

    /// Forgets a failed request so it becomes eligible for a retry.
    pub fn evict(&mut self, column: &ColumnId, from: u64, to: u64) {
        if let Some(set) = self.columns.get_mut(column) {
            set.remove_range(from, to);
        }
    }

    pub fn missing(&self, column: &ColumnId, from: u64, to: u64) -> Vec<(u64, u64)> {
        match self.columns.get(column) {
            Some(set) => set.missing_ranges(from, to),
            None if from < to => vec![(from, to)],
            None => vec![],
        }
    }
}

/// Per-dataset caches owned by one assembler instance.
pub type SessionCache = HashMap<DatasetId, DatasetCache>;
/// Per-dataset request trackers, same shape as [`SessionCache`].
pub type SessionTracker = HashMap<DatasetId, RequestTracker>;
