use crate::point::{sort_and_dedup, SeriesPoint};
use crate::source::{Delimiter, SourceSchema, SourceSpec};
use aed_utils::dates::mid_month;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fmt;

/// Comment marker used by the NOAA text feeds.
pub const COMMENT_MARKER: char = '#';

/// Errors from normalizing a raw payload. A payload that yields zero
/// parsable rows is a parse failure; individual malformed rows are
/// dropped silently and never fatal.
#[derive(Debug, PartialEq, Clone)]
pub enum ParseError {
    /// The payload contained no row that matched the schema.
    NoParsableRows,
    /// The payload was not the expected JSON shape.
    JsonShape(String),
    /// The schema references a column it does not define.
    MissingColumn(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NoParsableRows => write!(f, "no parsable rows in payload"),
            ParseError::JsonShape(msg) => write!(f, "unexpected JSON payload: {}", msg),
            ParseError::MissingColumn(name) => write!(f, "schema missing column: {}", name),
        }
    }
}

impl std::error::Error for ParseError {}

/// One row of the World Bank indicator payload. Extra fields are
/// ignored; `value` is null for years without data.
#[derive(Debug, Deserialize)]
struct WorldBankRow {
    date: String,
    value: Option<f64>,
}

/// Normalize a raw payload into the canonical (date, value, group)
/// shape for one source.
///
/// Records dated after `today` or before `epoch_start` are discarded.
/// Output is stable-sorted ascending by date with duplicate dates
/// dropped; upstream ordering is not assumed.
pub fn normalize(
    raw: &str,
    spec: &SourceSpec,
    epoch_start: NaiveDate,
    today: NaiveDate,
) -> Result<Vec<SeriesPoint>, ParseError> {
    let mut points = match &spec.schema {
        SourceSchema::Delimited {
            delimiter,
            columns,
            value_column,
        } => parse_delimited(raw, *delimiter, columns, value_column, &spec.group)?,
        SourceSchema::WorldBankJson => parse_world_bank(raw, &spec.group)?,
    };

    points.retain(|p| p.date >= epoch_start && p.date <= today);
    sort_and_dedup(&mut points);
    Ok(points)
}

fn column_index(columns: &[String], name: &str) -> Result<usize, ParseError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
}

/// Parse a comment-bearing delimited text feed. The date is built from
/// the `year` and `month` columns with the day fixed to mid-month.
fn parse_delimited(
    raw: &str,
    delimiter: Delimiter,
    columns: &[String],
    value_column: &str,
    group: &str,
) -> Result<Vec<SeriesPoint>, ParseError> {
    let year_idx = column_index(columns, "year")?;
    let month_idx = column_index(columns, "month")?;
    let value_idx = column_index(columns, value_column)?;

    let rows: Vec<Vec<String>> = match delimiter {
        Delimiter::Comma => ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(COMMENT_MARKER as u8))
            .from_reader(raw.as_bytes())
            .records()
            .filter_map(|r| r.ok())
            .map(|r| r.iter().map(|f| f.to_string()).collect())
            .collect(),
        Delimiter::Whitespace => raw
            .lines()
            .filter(|line| {
                let trimmed = line.trim_start();
                !trimmed.is_empty() && !trimmed.starts_with(COMMENT_MARKER)
            })
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect(),
    };

    let points: Vec<SeriesPoint> = rows
        .iter()
        .filter_map(|row| {
            let year: i32 = row.get(year_idx)?.trim().parse().ok()?;
            let month: u32 = row.get(month_idx)?.trim().parse().ok()?;
            let value: f64 = row.get(value_idx)?.trim().parse().ok()?;
            let date = mid_month(year, month)?;
            Some(SeriesPoint::new(date, value, group))
        })
        .collect();

    if points.is_empty() {
        return Err(ParseError::NoParsableRows);
    }
    Ok(points)
}

/// Parse a World Bank API v2 indicator payload: `[metadata, rows]`.
/// Rows with a null value are dropped; the bare year becomes a
/// January 1st date at yearly granularity.
fn parse_world_bank(raw: &str, group: &str) -> Result<Vec<SeriesPoint>, ParseError> {
    let (_meta, rows): (serde_json::Value, Vec<WorldBankRow>) =
        serde_json::from_str(raw).map_err(|e| ParseError::JsonShape(e.to_string()))?;

    let points: Vec<SeriesPoint> = rows
        .iter()
        .filter_map(|row| {
            let value = row.value?;
            let year: i32 = row.date.trim().parse().ok()?;
            let date = NaiveDate::from_ymd_opt(year, 1, 1)?;
            Some(SeriesPoint::new(date, value, group))
        })
        .collect();

    if points.is_empty() {
        return Err(ParseError::NoParsableRows);
    }
    Ok(points)
}
