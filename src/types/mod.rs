use serde::{Deserialize, Serialize};

use crate::error::CacheError;

pub type DatasetId = String;
pub type ColumnId = String;

/// One desired plotted series: a (dataset, column) sample range plus display
/// metadata. Many requests may reference the same column with different
/// ranges or offsets (e.g. overlapping experiment repeats).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRequest {
    pub dataset: DatasetId,
    /// The column providing x samples (e.g. elapsed time). Fetched and
    /// cached alongside the y column, since plotting needs paired coverage.
    pub x_column: ColumnId,
    pub column: ColumnId,
    pub from: u64,
    pub to: u64,
    /// Added to every x sample of this series.
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub color: Option<String>,
    pub label: String,
}

impl SeriesRequest {
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.from > self.to {
            return Err(CacheError::InvalidRange {
                label: self.label.clone(),
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }
}

/// One assembled series, ready for a line renderer. `x` and `y` have equal
/// length; a NaN in both arrays marks a gap between non-adjacent pieces so
/// no line is drawn across missing data. JSON serialization turns the NaN
/// sentinels into `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub color: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// A snapshot published after every assembly pass. `complete` is false while
/// some desired ranges are still missing (the loading state), true once every
/// desired range is covered by cached data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphUpdate {
    pub complete: bool,
    pub series: Vec<Series>,
}

#[cfg(test)]
mod tests {
    use super::{Series, SeriesRequest};

    #[test]
    fn test_request_deserialization_defaults() {
        let request: SeriesRequest = serde_json::from_str(
            r#"{
                "dataset": "42",
                "x_column": "time",
                "column": "voltage",
                "from": 0,
                "to": 100,
                "label": "cell 1 voltage"
            }"#,
        )
        .unwrap();
        assert_eq!(request.offset, 0.0);
        assert_eq!(request.color, None);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let request = SeriesRequest {
            dataset: "42".to_owned(),
            x_column: "time".to_owned(),
            column: "voltage".to_owned(),
            from: 10,
            to: 5,
            offset: 0.0,
            color: None,
            label: "bad".to_owned(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_gap_sentinel_serializes_as_null() {
        let series = Series {
            label: "v".to_owned(),
            color: None,
            x: vec![0.0, f64::NAN, 2.0],
            y: vec![1.0, f64::NAN, 3.0],
        };
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["x"][1], serde_json::Value::Null);
        assert_eq!(json["y"][1], serde_json::Value::Null);
    }
}
