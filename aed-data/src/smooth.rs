use crate::combine::CombinedTable;
use aed_sources::point::SeriesPoint;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Retain records with `start <= date <= end`, inclusive both ends at
/// day resolution. An inverted range yields an empty result rather
/// than an error; parameter validation is the caller's concern.
pub fn filter_range(records: &[SeriesPoint], start: NaiveDate, end: NaiveDate) -> Vec<SeriesPoint> {
    records
        .iter()
        .filter(|p| p.date >= start && p.date <= end)
        .cloned()
        .collect()
}

/// Derive the smoothed view of a combined table: filter to [start, end]
/// and apply a trailing moving average of width `window` independently
/// within each group. `window == 0` is filtering alone. The input table
/// is never mutated and the result is deterministic.
pub fn apply(
    table: &CombinedTable,
    start: NaiveDate,
    end: NaiveDate,
    window: usize,
) -> Vec<SeriesPoint> {
    let filtered = filter_range(&table.records, start, end);
    if window == 0 {
        return filtered;
    }
    smooth_grouped(filtered, window)
}

/// Replace each value with the mean of itself and up to `window - 1`
/// immediately preceding records of the same group, ordered by date.
/// The window shrinks near the start of each partition rather than
/// padding: the first record keeps its own value, the second averages
/// two, and so on up to full width. A window never spans two groups,
/// even when their dates interleave. Record positions are preserved.
fn smooth_grouped(mut records: Vec<SeriesPoint>, window: usize) -> Vec<SeriesPoint> {
    // Partition record indices by group, in order of first appearance.
    let mut partition_of: HashMap<String, usize> = HashMap::new();
    let mut partitions: Vec<Vec<usize>> = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let slot = *partition_of
            .entry(record.group.clone())
            .or_insert_with(|| {
                partitions.push(Vec::new());
                partitions.len() - 1
            });
        partitions[slot].push(i);
    }

    for indices in &mut partitions {
        indices.sort_by_key(|&i| records[i].date);
        let values: Vec<f64> = indices.iter().map(|&i| records[i].value).collect();
        for (j, &i) in indices.iter().enumerate() {
            let lo = (j + 1).saturating_sub(window);
            let tail = &values[lo..=j];
            records[i].value = tail.iter().sum::<f64>() / tail.len() as f64;
        }
    }
    records
}
