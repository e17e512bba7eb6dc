// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a client-supplied date into the UTC calendar day it falls on.
///
/// Accepts a plain `YYYY-MM-DD` date or a full RFC3339 timestamp.
pub fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Today's UTC calendar day.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_calendar_day("2025-01-01"),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
    }

    #[test]
    fn test_parse_rfc3339_truncates_to_utc_day() {
        // 23:30 at -02:00 is already the next day in UTC
        assert_eq!(
            parse_calendar_day("2025-01-01T23:30:00-02:00"),
            NaiveDate::from_ymd_opt(2025, 1, 2)
        );
        assert_eq!(
            parse_calendar_day("2025-03-10T08:00:00Z"),
            NaiveDate::from_ymd_opt(2025, 3, 10)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_calendar_day("yesterday"), None);
        assert_eq!(parse_calendar_day("2025-13-40"), None);
    }
}
