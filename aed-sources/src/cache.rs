use crate::clock::ReferenceClock;
use crate::point::SeriesPoint;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

/// Default freshness horizon for fetched series.
pub fn default_ttl() -> Duration {
    Duration::hours(1)
}

/// A fetched (or synthesized) series together with its provenance
/// label: the resource URL, or the sentinel when the fallback ran.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSeries {
    pub points: Vec<SeriesPoint>,
    pub provenance: String,
}

/// In-memory fetch result cache keyed by source key.
///
/// Entries younger than the TTL are served as-is; stale or missing
/// entries trigger a fetch whose result replaces the entry
/// (last-writer-wins, redundant concurrent fetches are acceptable).
/// The lock is never held across an await point.
pub struct FetchCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (CachedSeries, DateTime<Utc>)>>,
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        FetchCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl() -> Self {
        FetchCache::new(default_ttl())
    }

    /// Return the cached series for `key` if it is still fresh at `now`.
    pub fn lookup(&self, key: &str, now: DateTime<Utc>) -> Option<CachedSeries> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).and_then(|(series, fetched_at)| {
            if now - *fetched_at < self.ttl {
                Some(series.clone())
            } else {
                None
            }
        })
    }

    /// Store a fetch result for `key`, stamped at `now`.
    pub fn store(&self, key: &str, series: CachedSeries, now: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), (series, now));
    }

    /// Serve `key` from the cache when fresh, otherwise run `fetch` and
    /// cache its result.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        clock: &dyn ReferenceClock,
        fetch: F,
    ) -> CachedSeries
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = CachedSeries>,
    {
        if let Some(series) = self.lookup(key, clock.now()) {
            debug!("cache hit for {}", key);
            return series;
        }
        debug!("cache miss for {}", key);
        let series = fetch().await;
        self.store(key, series.clone(), clock.now());
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;

    fn series(provenance: &str) -> CachedSeries {
        CachedSeries {
            points: Vec::new(),
            provenance: provenance.to_string(),
        }
    }

    #[test]
    fn test_lookup_within_ttl() {
        let cache = FetchCache::new(Duration::hours(1));
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        cache.store("co2", series("https://example.invalid/co2"), t0);

        let fresh = cache.lookup("co2", t0 + Duration::minutes(59));
        assert_eq!(fresh.unwrap().provenance, "https://example.invalid/co2");
    }

    #[test]
    fn test_lookup_after_ttl_is_stale() {
        let cache = FetchCache::new(Duration::hours(1));
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        cache.store("co2", series("a"), t0);

        assert!(cache.lookup("co2", t0 + Duration::hours(1)).is_none());
    }

    #[tokio::test]
    async fn test_get_or_fetch_only_fetches_on_miss() {
        let cache = FetchCache::new(Duration::hours(1));
        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let clock = FixedClock(t0);

        let first = cache
            .get_or_fetch("co2", &clock, || async { series("first") })
            .await;
        assert_eq!(first.provenance, "first");

        // Within the TTL the stored value wins and the closure never runs.
        let second = cache
            .get_or_fetch("co2", &clock, || async {
                panic!("fetch should not run on a fresh entry")
            })
            .await;
        assert_eq!(second.provenance, "first");

        // A later clock expires the entry and the fetch runs again.
        let later = FixedClock(t0 + Duration::hours(2));
        let third = cache
            .get_or_fetch("co2", &later, || async { series("third") })
            .await;
        assert_eq!(third.provenance, "third");
    }
}
