use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Date-only layouts seen in article bylines, read as midnight UTC.
const DATE_FORMATS: &[&str] = &[
    "%d %b %Y",  // 12 Oct 2024
    "%e %b %Y",  // 5 Oct 2024
    "%d %B %Y",  // 12 October 2024
    "%e %B %Y",  // 5 October 2024
    "%b %d, %Y", // Oct 12, 2024
    "%b %e, %Y", // Oct 5, 2024
    "%B %d, %Y", // October 12, 2024
    "%B %e, %Y", // October 5, 2024
    "%Y-%m-%d",  // 2024-10-12
];

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d %b %Y %H:%M"];

/// Parses a human-readable date into a UTC timestamp.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    dateparser::parse_with_timezone(s, &Utc).ok()
}

/// Parses a display date and renders it as ISO-8601 UTC with milliseconds,
/// e.g. `2024-10-12T00:00:00.000Z`.
pub fn parse_display_date(raw: &str) -> Option<String> {
    parse_date(raw).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}
