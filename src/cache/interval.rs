/// A contiguous run of samples over the half-open index range `[from, to)`.
///
/// Data intervals carry exactly `to - from` values. The request tracker
/// stores valueless intervals (empty `values`) to mark a range as requested
/// without holding any data; both kinds merge, but a single `IntervalSet`
/// only ever holds one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    from: u64,
    to: u64,
    values: Vec<f64>,
}

impl Interval {
    pub fn new(from: u64, values: Vec<f64>) -> Self {
        let to = from + values.len() as u64;
        Self { from, to, values }
    }

    /// A valueless interval marking `[from, to)` as requested.
    pub fn span(from: u64, to: u64) -> Self {
        assert!(from <= to, "invalid span [{from}, {to})");
        Self {
            from,
            to,
            values: Vec::new(),
        }
    }

    pub fn from(&self) -> u64 {
        self.from
    }

    pub fn to(&self) -> u64 {
        self.to
    }

    pub fn len(&self) -> u64 {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// True if the ranges overlap or touch, i.e. the union is contiguous.
    pub fn overlaps_or_touches(&self, other: &Interval) -> bool {
        other.from <= self.to && self.from <= other.to
    }

    /// Merges two overlapping-or-touching intervals into one spanning the
    /// union. The result's values are the lower interval's values followed by
    /// the upper interval's suffix past the overlap point; if one interval
    /// contains the other, the containing interval is returned unchanged.
    pub fn merge(self, other: Interval) -> Interval {
        debug_assert!(self.overlaps_or_touches(&other));
        let (lower, upper) = if self.from <= other.from {
            (self, other)
        } else {
            (other, self)
        };
        if upper.to <= lower.to {
            return lower;
        }
        let to = upper.to;
        let mut values = lower.values;
        if !upper.values.is_empty() {
            let overlap = (lower.to - upper.from) as usize;
            values.extend_from_slice(&upper.values[overlap..]);
        }
        Interval {
            from: lower.from,
            to,
            values,
        }
    }

    /// Restricts the interval to `[from, to)`. The bounds must lie within
    /// the interval.
    pub fn slice(&self, from: u64, to: u64) -> Interval {
        debug_assert!(self.from <= from && to <= self.to && from <= to);
        if self.values.is_empty() {
            return Interval::span(from, to);
        }
        let lo = (from - self.from) as usize;
        let hi = (to - self.from) as usize;
        Interval {
            from,
            to,
            values: self.values[lo..hi].to_vec(),
        }
    }
}
