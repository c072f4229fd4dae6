//! Flexible date parsing and the two date renderings.
//!
//! Timestamps keep the wall-clock time written in the document; offsets are
//! parsed but not converted, so a publication date never moves to the
//! neighbouring day.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%m/%d/%Y",
];

/// Parse a date or timestamp in any of the shapes documents use.
///
/// Accepts ISO 8601 / RFC 3339, RFC 2822, PDF `D:` dates, common written
/// forms (`5 March 2020`, `March 5, 2020`) and year-month (`2020-03`).
/// A bare year is not a date.
pub fn parse_flexible(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(pdf) = input.strip_prefix("D:") {
        return parse_pdf_date(pdf);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.naive_local());
    }
    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Some(dt.naive_local());
        }
    }

    // A trailing `Z` the naive formats cannot express
    let naive_input = input.strip_suffix('Z').unwrap_or(input);
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive_input, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }
    parse_year_month(input)
}

/// `2020-03` → 2020-03-01.
fn parse_year_month(input: &str) -> Option<NaiveDateTime> {
    let (year, month) = input.split_once('-')?;
    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?;
    Some(date.and_time(NaiveTime::MIN))
}

/// PDF date body: `YYYY[MM[DD[HH[mm[SS]]]]]` followed by an optional offset.
fn parse_pdf_date(body: &str) -> Option<NaiveDateTime> {
    let digits: String = body.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() < 4 {
        return None;
    }
    let field = |start: usize, default: u32| -> Option<u32> {
        match digits.get(start..start + 2) {
            Some(part) => part.parse().ok(),
            None => Some(default),
        }
    };
    let date = NaiveDate::from_ymd_opt(digits[..4].parse().ok()?, field(4, 1)?, field(6, 1)?)?;
    let time = NaiveTime::from_hms_opt(field(8, 0)?, field(10, 0)?, field(12, 0)?)?;
    Some(date.and_time(time))
}

/// Clean a PDF-native date before parsing.
///
/// Writers append junk after the `Z` designator (`Z00'00'`) and write
/// offsets as `+05'30'`; both are reduced to forms the parser accepts.
pub fn clean_pdf_date(input: &str) -> String {
    let input = input.trim();
    if let Some(pos) = input.find('Z') {
        return input[..=pos].to_string();
    }
    match input.rfind(['+', '-']) {
        // Only an offset after the time digits counts
        Some(pos) if pos > 2 => {
            let (head, offset) = input.split_at(pos);
            let cleaned: String = offset.chars().filter(|c| *c != '\'').collect();
            format!("{head}{cleaned}")
        },
        _ => input.to_string(),
    }
}

/// Render as `YYYY-MM-DD`; unparseable input is returned unchanged.
pub fn format_date(input: &str) -> String {
    match parse_flexible(input) {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => input.to_string(),
    }
}

/// Render as `YYYY-MM-DD HH:MM`, dropping a ` 00:00` time of day.
pub fn format_date_time(input: &str) -> String {
    match parse_flexible(input) {
        Some(dt) => {
            let rendered = dt.format("%Y-%m-%d %H:%M").to_string();
            match rendered.strip_suffix(" 00:00") {
                Some(date) => date.to_string(),
                None => rendered,
            }
        },
        None => input.to_string(),
    }
}
