use crate::normalize::ParseError;
use crate::point::{epoch_start, SeriesPoint};
use crate::source::SourceSpec;
use crate::synthetic;
use chrono::NaiveDate;
use log::warn;
use std::fmt;

#[cfg(feature = "api")]
use crate::clock::ReferenceClock;
#[cfg(feature = "api")]
use crate::normalize::normalize;
#[cfg(feature = "api")]
use reqwest::{Client, StatusCode};
#[cfg(feature = "api")]
use std::time::Duration;

/// Hard bound on each retrieval attempt, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 15;

/// Provenance label reported when the synthetic fallback was used in
/// place of a real source.
pub const SYNTHETIC_LABEL: &str = "example data";

/// Errors from fetching and normalizing one source. All variants are
/// recovered at the `recover_with_synthetic` boundary; none escape to
/// the caller of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection failure or timeout.
    Request(String),
    /// Non-success HTTP status.
    Status(u16),
    /// Response body could not be decoded as text.
    Body(String),
    /// Payload fetched but not parsable under the source schema.
    Parse(ParseError),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Request(msg) => write!(f, "request failed: {}", msg),
            FetchError::Status(code) => write!(f, "bad response status: {}", code),
            FetchError::Body(msg) => write!(f, "failed to read response body: {}", msg),
            FetchError::Parse(e) => write!(f, "parse failure: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<ParseError> for FetchError {
    fn from(e: ParseError) -> Self {
        FetchError::Parse(e)
    }
}

/// Build the HTTP client used for all source fetches. Every request
/// carries the hard timeout; nothing blocks indefinitely.
#[cfg(feature = "api")]
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
}

/// Fetch the raw payload for one source. A single attempt; retries are
/// the caller's concern (in practice the fallback path covers outages).
#[cfg(feature = "api")]
pub async fn fetch_raw(client: &Client, spec: &SourceSpec) -> Result<String, FetchError> {
    let response = client
        .get(&spec.url)
        .send()
        .await
        .map_err(|e| FetchError::Request(e.to_string()))?;
    if response.status() != StatusCode::OK {
        return Err(FetchError::Status(response.status().as_u16()));
    }
    response
        .text()
        .await
        .map_err(|e| FetchError::Body(e.to_string()))
}

/// Fetch and normalize one source.
#[cfg(feature = "api")]
pub async fn fetch_series(
    client: &Client,
    spec: &SourceSpec,
    clock: &dyn ReferenceClock,
) -> Result<Vec<SeriesPoint>, FetchError> {
    let raw = fetch_raw(client, spec).await?;
    Ok(normalize(&raw, spec, epoch_start(), clock.today())?)
}

/// Fold a fetch failure into the deterministic synthetic substitute.
///
/// Success passes through with the real URL as provenance; any failure
/// yields the synthetic series (clamped to [epoch, today]) tagged with
/// the sentinel label. This is the only place fetch errors are handled;
/// past this boundary there is no error path.
pub fn recover_with_synthetic(
    result: Result<Vec<SeriesPoint>, FetchError>,
    spec: &SourceSpec,
    today: NaiveDate,
) -> (Vec<SeriesPoint>, String) {
    match result {
        Ok(points) => (points, spec.url.clone()),
        Err(e) => {
            warn!("falling back to synthetic data for {}: {}", spec.key, e);
            let mut points = synthetic::generate(spec);
            points.retain(|p| p.date >= epoch_start() && p.date <= today);
            (points, SYNTHETIC_LABEL.to_string())
        }
    }
}
