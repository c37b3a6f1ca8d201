//! Query pipeline: fetch each configured source (through the fetch
//! cache, degrading to synthetic data on failure), combine, filter and
//! smooth, then write the canonical CSV.

use crate::ViewArgs;
use aed_data::combine::{combine, CombinedTable};
use aed_data::{export, smooth};
use aed_sources::cache::{CachedSeries, FetchCache};
use aed_sources::clock::{ReferenceClock, SystemClock};
use aed_sources::fetch;
use aed_sources::source::SourceSpec;
use aed_utils::dates::parse_date;
use chrono::NaiveDate;
use log::info;

/// Latest date the default end-of-range is allowed to reach.
fn default_end_cap() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
}

/// Resolve the view arguments against today's date. The end defaults
/// to min(today, cap); an inverted range is passed through and simply
/// yields an empty export downstream.
fn resolve_view(view: &ViewArgs, today: NaiveDate) -> anyhow::Result<(NaiveDate, NaiveDate, usize)> {
    let start = parse_date(&view.start)?;
    let end = match &view.end {
        Some(s) => parse_date(s)?,
        None => today.min(default_end_cap()),
    };
    Ok((start, end, view.window as usize))
}

/// Fetch every source in order, each independently falling back to its
/// synthetic substitute, and concatenate the results. Fetches within
/// the cache's freshness window are served from memory.
async fn fetch_combined(
    client: &reqwest::Client,
    cache: &FetchCache,
    specs: &[SourceSpec],
    clock: &dyn ReferenceClock,
) -> CombinedTable {
    let mut series = Vec::with_capacity(specs.len());
    for spec in specs {
        let cached = cache
            .get_or_fetch(&spec.key, clock, || async {
                let result = fetch::fetch_series(client, spec, clock).await;
                let (points, provenance) =
                    fetch::recover_with_synthetic(result, spec, clock.today());
                CachedSeries { points, provenance }
            })
            .await;
        series.push((cached.points, cached.provenance));
    }
    combine(series)
}

/// Run one query: fetch the given sources, apply the view parameters
/// and write the smoothed CSV to `output_csv`.
pub async fn run_query(
    specs: Vec<SourceSpec>,
    output_csv: &str,
    view: &ViewArgs,
) -> anyhow::Result<()> {
    let clock = SystemClock;
    let (start, end, window) = resolve_view(view, clock.today())?;

    info!(
        "Querying {} sources, range {} to {}, window {}",
        specs.len(),
        start,
        end,
        window
    );

    let client = fetch::build_client()?;
    let cache = FetchCache::with_default_ttl();
    let table = fetch_combined(&client, &cache, &specs, &clock).await;

    for (spec, provenance) in specs.iter().zip(table.provenance.iter()) {
        info!("{}: {}", spec.group, provenance);
    }

    let smoothed = smooth::apply(&table, start, end, window);
    let csv = export::write_csv(&smoothed)?;
    std::fs::write(output_csv, csv)?;

    info!(
        "Query complete. {} records written to {}",
        smoothed.len(),
        output_csv
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn view(start: &str, end: Option<&str>, window: u32) -> ViewArgs {
        ViewArgs {
            start: start.to_string(),
            end: end.map(str::to_string),
            window,
        }
    }

    #[test]
    fn test_resolve_view_defaults_to_today() {
        let today = d(2024, 6, 1);
        let (start, end, window) = resolve_view(&view("2000-01-01", None, 6), today).unwrap();
        assert_eq!(start, d(2000, 1, 1));
        assert_eq!(end, today);
        assert_eq!(window, 6);
    }

    #[test]
    fn test_resolve_view_caps_default_end() {
        let today = d(2026, 8, 30);
        let (_, end, _) = resolve_view(&view("2000-01-01", None, 0), today).unwrap();
        assert_eq!(end, d(2025, 12, 31));
    }

    #[test]
    fn test_resolve_view_explicit_end() {
        let today = d(2024, 6, 1);
        let (_, end, _) = resolve_view(&view("2010-01-01", Some("2012-12-31"), 3), today).unwrap();
        assert_eq!(end, d(2012, 12, 31));
    }

    #[test]
    fn test_resolve_view_bad_date() {
        let today = d(2024, 6, 1);
        assert!(resolve_view(&view("not-a-date", None, 6), today).is_err());
    }
}
