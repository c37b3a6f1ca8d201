use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Earliest date any series is allowed to carry. Records before the
/// epoch are discarded during normalization.
pub fn epoch_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

/// A single normalized measurement from one series.
///
/// Dates carry month resolution for gas series (day fixed to 15) and
/// year resolution for energy series (January 1st); `group` names the
/// series the point belongs to within a combined table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub group: String,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, value: f64, group: &str) -> Self {
        SeriesPoint {
            date,
            value,
            group: group.to_string(),
        }
    }
}

/// Stable-sort a series by date and drop duplicate dates, keeping the
/// first occurrence. Upstream feeds are usually ordered already, but
/// this must not be assumed.
pub fn sort_and_dedup(points: &mut Vec<SeriesPoint>) {
    points.sort_by_key(|p| p.date);
    points.dedup_by(|a, b| a.date == b.date && a.group == b.group);
}
