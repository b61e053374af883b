//! Date normalization for listing date strings
//!
//! The board renders dates in two shapes: a numeric `D.M.YYYY` form used by
//! most localized views, and an English `D MonthName` form that omits the
//! year. Both are normalized to UTC instants. The board itself runs on
//! Georgian time, so year-less dates are shifted by the source offset.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// Offset of the source site's local time from UTC, in hours
const SOURCE_UTC_OFFSET_HOURS: i64 = 4;

/// Normalizes a raw listing date string to a UTC instant
///
/// # Normalization Rules
///
/// - Empty or blank input: the current instant
/// - `D.M.YYYY` anywhere in the string: that date at midnight UTC
/// - `D MonthName` (English month, no year): that date in the current year,
///   rolled forward one year if already past, shifted by the source offset
/// - Anything else, including impossible calendar dates: the current
///   instant shifted by the source offset
///
/// # Example
///
/// ```
/// use saqme::crawler::normalize_date;
///
/// let deadline = normalize_date("25.09.2026");
/// assert_eq!(deadline.to_rfc3339(), "2026-09-25T00:00:00+00:00");
/// ```
pub fn normalize_date(raw: &str) -> DateTime<Utc> {
    normalize_date_at(raw, Utc::now())
}

/// Normalizes a raw date string against an explicit "now"
///
/// Split out from [`normalize_date`] so the year-rollover rule can be
/// exercised deterministically.
pub fn normalize_date_at(raw: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    let raw = raw.trim();
    if raw.is_empty() {
        return now;
    }

    if let Some(date) = parse_numeric_date(raw) {
        return date;
    }

    if let Some(date) = parse_month_name_date(raw, now) {
        return date;
    }

    now + Duration::hours(SOURCE_UTC_OFFSET_HOURS)
}

/// Finds a `D.M.YYYY` token and converts it to midnight UTC
fn parse_numeric_date(raw: &str) -> Option<DateTime<Utc>> {
    for token in raw.split_whitespace() {
        let fields: Vec<&str> = token.split('.').collect();
        if fields.len() != 3 {
            continue;
        }

        let all_digits = fields
            .iter()
            .all(|f| !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()));
        if !all_digits || fields[0].len() > 2 || fields[1].len() > 2 || fields[2].len() != 4 {
            continue;
        }

        let day = fields[0].parse::<u32>().ok()?;
        let month = fields[1].parse::<u32>().ok()?;
        let year = fields[2].parse::<i32>().ok()?;

        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Some(Utc.from_utc_datetime(&midnight));
            }
        }
    }

    None
}

/// Resolves a year-less `D MonthName` date against the current year
///
/// Dates already in the past roll forward to the next year, then the
/// source offset is applied. Returns None when the words do not form a
/// real calendar date.
fn parse_month_name_date(raw: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let (day, month_word) = first_day_word_pair(&words)?;
    let month = month_number(month_word)?;

    let midnight = NaiveDate::from_ymd_opt(now.year(), month, day)?.and_hms_opt(0, 0, 0)?;
    let mut resolved = Utc.from_utc_datetime(&midnight);

    if resolved < now {
        let next_year = NaiveDate::from_ymd_opt(now.year() + 1, month, day)?.and_hms_opt(0, 0, 0)?;
        resolved = Utc.from_utc_datetime(&next_year);
    }

    Some(resolved + Duration::hours(SOURCE_UTC_OFFSET_HOURS))
}

/// First "short number followed by a word" pair in the input
fn first_day_word_pair<'a>(words: &[&'a str]) -> Option<(u32, &'a str)> {
    for pair in words.windows(2) {
        if pair[0].len() <= 2 && pair[0].chars().all(|c| c.is_ascii_digit()) {
            if let Ok(day) = pair[0].parse::<u32>() {
                return Some((day, pair[1]));
            }
        }
    }
    None
}

/// English month name to month number, case-insensitive
fn month_number(word: &str) -> Option<u32> {
    match word.to_lowercase().as_str() {
        "january" => Some(1),
        "february" => Some(2),
        "march" => Some(3),
        "april" => Some(4),
        "may" => Some(5),
        "june" => Some(6),
        "july" => Some(7),
        "august" => Some(8),
        "september" => Some(9),
        "october" => Some(10),
        "november" => Some(11),
        "december" => Some(12),
        _ => None,
    }
}
