use chrono::{DateTime, Local, NaiveDate, Utc};

/// Source of "now" for the fetch cache and "today" for date-boundary
/// filtering. Injected rather than read ambiently so that boundary
/// behavior is reproducible in tests.
pub trait ReferenceClock {
    fn now(&self) -> DateTime<Utc>;
    fn today(&self) -> NaiveDate;
}

/// Wall-clock implementation. "Today" is taken in the process-local
/// time zone, matching the reference zone the feeds are displayed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ReferenceClock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().naive_local().date()
    }
}

/// Clock pinned to a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl ReferenceClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }

    fn today(&self) -> NaiveDate {
        self.0.date_naive()
    }
}
