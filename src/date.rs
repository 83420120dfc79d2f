//! QIF date parsing.
//!
//! Quicken writes US-ordered dates with either `/` or `'` before the year,
//! e.g. `1/ 5'06`, `12/31/1999`. Some exporters write ISO dates instead.

use chrono::NaiveDate;

/// Separator Quicken uses in front of years in the 2000s.
const CENTURY_SEPARATOR: char = '\'';

/// Parses a QIF date field.
///
/// Returns `None` if the text is not a recognizable date or names a day
/// that does not exist.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();

    if trimmed.contains('-') {
        return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok();
    }

    let after_apostrophe = trimmed.contains(CENTURY_SEPARATOR);
    let normalized = trimmed.replace(CENTURY_SEPARATOR, "/");

    let mut parts = normalized.split('/').map(|part| part.replace(' ', ""));
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year_text = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let year: i32 = year_text.parse().ok()?;
    let year = if year_text.len() <= 2 {
        expand_short_year(year, after_apostrophe)
    } else {
        year
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn expand_short_year(year: i32, after_apostrophe: bool) -> i32 {
    if after_apostrophe || year < 30 {
        2000 + year
    } else {
        1900 + year
    }
}
