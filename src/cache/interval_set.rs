use std::collections::BTreeMap;

use super::interval::Interval;

/// An ordered set of disjoint, non-touching intervals for one column,
/// keyed by start index. Any insertion that overlaps or touches existing
/// members merges with all of them, so traversal always yields strictly
/// increasing, disjoint ranges.
#[derive(Debug, Default, Clone)]
pub struct IntervalSet {
    intervals: BTreeMap<u64, Interval>,
}

impl IntervalSet {
    pub fn insert(&mut self, interval: Interval) {
        let mut merged = interval;
        let absorbed: Vec<u64> = self
            .intervals
            .range(..=merged.to())
            .rev()
            .take_while(|(_, iv)| iv.to() >= merged.from())
            .map(|(start, _)| *start)
            .collect();
        for start in absorbed {
            let existing = self
                .intervals
                .remove(&start)
                .expect("absorbed interval must be present");
            merged = merged.merge(existing);
        }
        self.intervals.insert(merged.from(), merged);
    }

    /// The complement of the covered region within `[from, to)`, ascending.
    pub fn missing_ranges(&self, from: u64, to: u64) -> Vec<(u64, u64)> {
        let mut gaps = Vec::new();
        if from >= to {
            return gaps;
        }
        let mut cursor = from;
        for (_, iv) in self.overlapping(from, to) {
            if iv.from() > cursor {
                gaps.push((cursor, iv.from()));
            }
            cursor = iv.to();
            if cursor >= to {
                break;
            }
        }
        if cursor < to {
            gaps.push((cursor, to));
        }
        gaps
    }

    /// The covered pieces of `[from, to)`, clipped to the bounds, ascending.
    /// Gaps are omitted; the caller decides how to render them.
    pub fn extract(&self, from: u64, to: u64) -> Vec<Interval> {
        if from >= to {
            return Vec::new();
        }
        self.overlapping(from, to)
            .map(|(_, iv)| iv.slice(iv.from().max(from), iv.to().min(to)))
            .filter(|piece| !piece.is_empty())
            .collect()
    }

    /// Subtracts `[from, to)` from the set, splitting a straddling interval.
    pub fn remove_range(&mut self, from: u64, to: u64) {
        if from >= to {
            return;
        }
        let affected: Vec<u64> = self
            .intervals
            .range(..to)
            .filter(|(_, iv)| iv.to() > from)
            .map(|(start, _)| *start)
            .collect();
        for start in affected {
            let iv = self
                .intervals
                .remove(&start)
                .expect("affected interval must be present");
            if iv.from() < from {
                self.intervals.insert(iv.from(), iv.slice(iv.from(), from));
            }
            if iv.to() > to {
                self.intervals.insert(to, iv.slice(to, iv.to()));
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.values()
    }

    /// Stored intervals intersecting `[from, to)`, in ascending order.
    fn overlapping(&self, from: u64, to: u64) -> impl Iterator<Item = (&u64, &Interval)> {
        // The interval covering `from`, if any, starts at or before it.
        let first = self
            .intervals
            .range(..=from)
            .next_back()
            .filter(|(_, iv)| iv.to() > from)
            .map(|(start, _)| *start)
            .unwrap_or(from);
        self.intervals
            .range(first..)
            .take_while(move |(start, _)| **start < to)
    }
}

#[cfg(test)]
mod tests {
    use super::{Interval, IntervalSet};

    fn ranges(set: &IntervalSet) -> Vec<(u64, u64)> {
        set.iter().map(|iv| (iv.from(), iv.to())).collect()
    }

    #[test]
    fn test_adjacent_inserts_merge() {
        // adjacent inserts collapse into one run with no seam
        let mut set = IntervalSet::default();
        let v1: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let v2: Vec<f64> = (50..100).map(|i| i as f64).collect();
        set.insert(Interval::new(0, v1.clone()));
        set.insert(Interval::new(50, v2.clone()));

        assert_eq!(ranges(&set), vec![(0, 100)]);
        let expected: Vec<f64> = v1.into_iter().chain(v2).collect();
        assert_eq!(set.iter().next().unwrap().values(), expected.as_slice());
        assert_eq!(set.missing_ranges(0, 100), vec![]);
    }

    #[test]
    fn test_gap_between_intervals() {
        // the hole between two cached runs is reported as missing
        let mut set = IntervalSet::default();
        set.insert(Interval::new(0, vec![0.0; 10]));
        set.insert(Interval::new(20, vec![0.0; 10]));
        assert_eq!(set.missing_ranges(0, 30), vec![(10, 20)]);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = IntervalSet::default();
        let iv = Interval::new(5, vec![1.0, 2.0, 3.0]);
        set.insert(iv.clone());
        let before = ranges(&set);
        let missing_before = set.missing_ranges(0, 10);
        set.insert(iv);
        assert_eq!(ranges(&set), before);
        assert_eq!(set.missing_ranges(0, 10), missing_before);
        assert_eq!(set.extract(0, 10).len(), 1);
    }

    #[test]
    fn test_insert_bridges_many() {
        let mut set = IntervalSet::default();
        set.insert(Interval::new(0, vec![0.0; 2]));
        set.insert(Interval::new(4, vec![0.0; 2]));
        set.insert(Interval::new(8, vec![0.0; 2]));
        set.insert(Interval::new(1, vec![0.0; 8]));
        assert_eq!(ranges(&set), vec![(0, 10)]);
    }

    #[test]
    fn test_missing_ranges_edge_cases() {
        let set = IntervalSet::default();
        assert_eq!(set.missing_ranges(5, 5), vec![]);
        assert_eq!(set.missing_ranges(0, 10), vec![(0, 10)]);

        let mut set = IntervalSet::default();
        set.insert(Interval::new(0, vec![0.0; 100]));
        assert_eq!(set.missing_ranges(20, 80), vec![]);
        assert_eq!(set.missing_ranges(50, 150), vec![(100, 150)]);
        assert_eq!(set.missing_ranges(100, 120), vec![(100, 120)]);
    }

    #[test]
    fn test_extract_clips_to_bounds() {
        // only [5, 15) of the queried range is covered
        let mut set = IntervalSet::default();
        let values: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        set.insert(Interval::new(5, values.clone()));

        let pieces = set.extract(0, 20);
        assert_eq!(pieces.len(), 1);
        assert_eq!((pieces[0].from(), pieces[0].to()), (5, 15));
        assert_eq!(pieces[0].values(), values.as_slice());

        let pieces = set.extract(7, 12);
        assert_eq!(pieces.len(), 1);
        assert_eq!((pieces[0].from(), pieces[0].to()), (7, 12));
        assert_eq!(pieces[0].values(), &[3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_extract_skips_gaps() {
        let mut set = IntervalSet::default();
        set.insert(Interval::new(0, vec![1.0, 2.0]));
        set.insert(Interval::new(5, vec![6.0, 7.0]));
        let pieces = set.extract(0, 10);
        assert_eq!(pieces.len(), 2);
        assert_eq!((pieces[0].from(), pieces[0].to()), (0, 2));
        assert_eq!((pieces[1].from(), pieces[1].to()), (5, 7));
    }

    #[test]
    fn test_complement_extract_duality() {
        // Covered pieces plus missing ranges reconstruct the query exactly.
        let mut set = IntervalSet::default();
        set.insert(Interval::new(3, vec![0.0; 4]));
        set.insert(Interval::new(10, vec![0.0; 5]));
        set.insert(Interval::new(20, vec![0.0; 10]));

        for (from, to) in [(0u64, 40u64), (3, 15), (7, 22), (16, 19), (25, 28)] {
            let mut spans: Vec<(u64, u64)> = set
                .extract(from, to)
                .iter()
                .map(|iv| (iv.from(), iv.to()))
                .chain(set.missing_ranges(from, to))
                .collect();
            spans.sort();
            let mut cursor = from;
            for (a, b) in spans {
                assert_eq!(a, cursor, "query [{from}, {to})");
                assert!(a < b);
                cursor = b;
            }
            assert_eq!(cursor, to, "query [{from}, {to})");
        }
    }

    #[test]
    fn test_remove_range_splits() {
        let mut set = IntervalSet::default();
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        set.insert(Interval::new(0, values));
        set.remove_range(3, 6);
        assert_eq!(ranges(&set), vec![(0, 3), (6, 10)]);
        let pieces = set.extract(0, 10);
        assert_eq!(pieces[0].values(), &[0.0, 1.0, 2.0]);
        assert_eq!(pieces[1].values(), &[6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_remove_range_spanning_multiple() {
        let mut set = IntervalSet::default();
        set.insert(Interval::span(0, 10));
        set.insert(Interval::span(20, 30));
        set.remove_range(5, 25);
        assert_eq!(ranges(&set), vec![(0, 5), (25, 30)]);
        set.remove_range(0, 30);
        assert!(set.is_empty());
    }
}
