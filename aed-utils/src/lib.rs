//! Shared utility functions for AED crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Day-of-month used when a feed only reports year and month.
    /// Mid-month avoids end-of-month edge cases during later resampling.
    pub const MID_MONTH_DAY: u32 = 15;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Build the mid-month date for a given year and month.
    /// Returns None for an invalid month.
    pub fn mid_month(year: i32, month: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, MID_MONTH_DAY)
    }

    /// Advance a (year, month) pair by one calendar month.
    pub fn month_after(year: i32, month: u32) -> (i32, u32) {
        if month >= 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        }
    }

    /// First day of the year a date falls in.
    pub fn year_start(date: &NaiveDate) -> NaiveDate {
        NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap()
    }

}
