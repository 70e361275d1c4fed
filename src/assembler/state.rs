use std::collections::HashMap;

use itertools::Itertools;
use tracing::info;

use crate::cache::{Interval, IntervalSet, SessionCache, SessionTracker};
use crate::fetch::FetchRequest;
use crate::types::{ColumnId, DatasetId, GraphUpdate, SeriesRequest};

use super::series::assemble_series;

/// Bookkeeping for one assembler: the desired series, the per-dataset data
/// caches and request trackers, and the fetches computed as pending.
/// `to_fetch` always equals the desired coverage minus everything already
/// requested (in flight or fulfilled).
#[derive(Default)]
pub struct State {
    desired: Vec<SeriesRequest>,
    cache: SessionCache,
    requested: SessionTracker,
    to_fetch: Vec<FetchRequest>,
}

#[derive(Debug)]
pub enum UpdateStatus {
    Unchanged,
    Updated,
}

impl State {
    pub fn set_desired(&mut self, desired: Vec<SeriesRequest>) -> UpdateStatus {
        let status = if self.desired == desired {
            UpdateStatus::Unchanged
        } else {
            UpdateStatus::Updated
        };

        self.desired = desired;
        self.recompute_to_fetch();

        status
    }

    /// The diffing pass: recomputes pending fetches for the current desired
    /// set against the request tracker. For every series both the y column
    /// and its x column are required over the same range. Idempotent.
    pub fn recompute_to_fetch(&mut self) {
        self.to_fetch.clear();
        // collapses overlapping requirements from different series within
        // this pass, before any of them is marked in the tracker
        let mut planned: HashMap<(DatasetId, ColumnId), IntervalSet> = HashMap::new();
        for request in &self.desired {
            for column in [&request.x_column, &request.column] {
                let gaps = match self.requested.get(&request.dataset) {
                    Some(tracker) => tracker.missing(column, request.from, request.to),
                    None if request.from < request.to => vec![(request.from, request.to)],
                    None => vec![],
                };
                let planned_set = planned
                    .entry((request.dataset.clone(), column.clone()))
                    .or_default();
                for (gap_from, gap_to) in gaps {
                    for (from, to) in planned_set.missing_ranges(gap_from, gap_to) {
                        self.to_fetch.push(FetchRequest {
                            dataset: request.dataset.clone(),
                            column: column.clone(),
                            from,
                            to,
                        });
                        planned_set.insert(Interval::span(from, to));
                    }
                }
            }
        }
    }

    /// Pops the next fetch to issue and marks its range as requested, so a
    /// later diffing pass does not request it again while it is in flight.
    /// Prefers the (dataset, column) group with the fewest pending fetches
    /// so paired x/y columns advance together.
    pub fn take_next_fetch(&mut self) -> Option<FetchRequest> {
        let request = {
            let (_key, requests) = self
                .to_fetch
                .iter()
                .into_group_map_by(|request| (request.dataset.clone(), request.column.clone()))
                .into_iter()
                .min_by_key(|(_key, requests)| requests.len())?;
            (*requests.first()?).clone()
        };
        self.to_fetch.retain(|pending| *pending != request);
        self.requested
            .entry(request.dataset.clone())
            .or_default()
            .mark(&request.column, request.from, request.to);
        Some(request)
    }

    /// Records a fetch outcome. Successful data goes into the cache; a
    /// failure is evicted from the tracker so the range can be retried.
    /// Either way the pending fetches are recomputed against the desired set
    /// as it is *now*, not as it was when the fetch was issued.
    pub fn complete_fetch(&mut self, request: &FetchRequest, values: Option<Vec<f64>>) {
        match values {
            Some(values) => {
                debug_assert_eq!(values.len() as u64, request.len());
                self.cache
                    .entry(request.dataset.clone())
                    .or_default()
                    .record(&request.column, Interval::new(request.from, values));
            }
            None => {
                if let Some(tracker) = self.requested.get_mut(&request.dataset) {
                    tracker.evict(&request.column, request.from, request.to);
                }
            }
        }
        self.recompute_to_fetch();
    }

    /// True once cached data covers every desired range (x and y columns).
    pub fn is_satisfied(&self) -> bool {
        self.desired.iter().all(|request| {
            let Some(cache) = self.cache.get(&request.dataset) else {
                return request.from == request.to;
            };
            cache
                .missing(&request.column, request.from, request.to)
                .is_empty()
                && cache
                    .missing(&request.x_column, request.from, request.to)
                    .is_empty()
        })
    }

    /// Assembles whatever is currently extractable, one series per desired
    /// request, flagged complete only when nothing is missing.
    pub fn assemble(&self) -> GraphUpdate {
        GraphUpdate {
            complete: self.is_satisfied(),
            series: self
                .desired
                .iter()
                .map(|request| assemble_series(request, self.cache.get(&request.dataset)))
                .collect(),
        }
    }

    pub fn report_status(&self) {
        info!(
            "Series desired: {}, pending fetches: {}",
            self.desired.len(),
            self.to_fetch.len()
        )
    }
}
