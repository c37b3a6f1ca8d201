use crate::point::SeriesPoint;
use crate::source::{Granularity, SourceSpec};
use aed_utils::dates::{mid_month, month_after};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate the substitute series for a source that could not be
/// fetched: one point per sampling interval across the fallback range,
/// values ramping linearly from start to end plus bounded uniform
/// noise. Seeded from the spec key, so repeated calls for the same
/// source produce identical data.
pub fn generate(spec: &SourceSpec) -> Vec<SeriesPoint> {
    let dates = sample_dates(
        spec.granularity,
        spec.fallback.start_date,
        spec.fallback.end_date,
    );
    let mut rng = StdRng::seed_from_u64(seed_for(&spec.key));

    let n = dates.len();
    let span = spec.fallback.end_value - spec.fallback.start_value;
    let noise = spec.fallback.noise;
    dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            let value = spec.fallback.start_value + span * t + rng.gen_range(-noise..=noise);
            SeriesPoint::new(date, value, &spec.group)
        })
        .collect()
}

/// Sampling dates across [start, end]: mid-month for monthly series,
/// January 1st for yearly series.
pub fn sample_dates(granularity: Granularity, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    match granularity {
        Granularity::Monthly => {
            let (mut year, mut month) = (start.year(), start.month());
            loop {
                let date = mid_month(year, month).unwrap();
                if date > end {
                    break;
                }
                if date >= start {
                    dates.push(date);
                }
                (year, month) = month_after(year, month);
            }
        }
        Granularity::Yearly => {
            for year in start.year()..=end.year() {
                let date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
                if date >= start && date <= end {
                    dates.push(date);
                }
            }
        }
    }
    dates
}

fn seed_for(key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{FallbackSpec, SourceSchema};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn spec(key: &str, granularity: Granularity) -> SourceSpec {
        SourceSpec {
            key: key.to_string(),
            url: "https://example.invalid/data".to_string(),
            group: "CO₂ (ppm)".to_string(),
            granularity,
            schema: SourceSchema::WorldBankJson,
            fallback: FallbackSpec {
                start_date: d(2000, 1, 1),
                end_date: d(2025, 1, 1),
                start_value: 370.0,
                end_value: 420.0,
                noise: 0.5,
            },
        }
    }

    #[test]
    fn test_monthly_sample_dates() {
        let dates = sample_dates(Granularity::Monthly, d(2000, 1, 1), d(2025, 1, 1));
        // 2000-01-15 through 2024-12-15: 25 years minus one trailing month
        assert_eq!(dates.len(), 300);
        assert_eq!(dates[0], d(2000, 1, 15));
        assert_eq!(*dates.last().unwrap(), d(2024, 12, 15));
    }

    #[test]
    fn test_yearly_sample_dates() {
        let dates = sample_dates(Granularity::Yearly, d(2000, 1, 1), d(2025, 1, 1));
        assert_eq!(dates.len(), 26);
        assert_eq!(dates[0], d(2000, 1, 1));
        assert_eq!(*dates.last().unwrap(), d(2025, 1, 1));
    }

    #[test]
    fn test_generate_matches_sampling_over_range() {
        let points = generate(&spec("co2", Granularity::Monthly));
        assert_eq!(points.len(), 300);
        // Sorted ascending, unique dates
        for pair in points.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        // Values stay on the ramp within the noise bound
        assert!((points[0].value - 370.0).abs() <= 0.5);
        assert!((points.last().unwrap().value - 420.0).abs() <= 0.5);
    }

    #[test]
    fn test_generate_is_deterministic_per_key() {
        let a = generate(&spec("co2", Granularity::Monthly));
        let b = generate(&spec("co2", Granularity::Monthly));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_keys_differ() {
        let a = generate(&spec("co2", Granularity::Monthly));
        let b = generate(&spec("ch4", Granularity::Monthly));
        assert_ne!(a[0].value, b[0].value);
    }
}
