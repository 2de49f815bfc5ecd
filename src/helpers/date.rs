//! Date helper functions

use chrono::{DateTime, TimeZone, Utc};

/// Display format used for post and video dates
pub const PRETTY_DATE_FORMAT: &str = "MMMM D, YYYY";

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMMM D, YYYY") // -> "March 1, 2024"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format an instant as ISO 8601 in UTC with millisecond precision
pub fn iso_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Format date in full format (like "January 1, 2024")
pub fn pretty_date(date: &DateTime<Utc>) -> String {
    format_date(date, PRETTY_DATE_FORMAT)
}

/// Convert Moment.js format to chrono format
///
/// Tokens are runs of the same letter, so `MMMM` and `M` never overlap.
fn moment_to_chrono_format(format: &str) -> String {
    let mut result = String::with_capacity(format.len() * 2);
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }

        let spec = match (c, run) {
            ('Y', 4) => "%Y",
            ('Y', 2) => "%y",
            ('M', 4) => "%B",
            ('M', 3) => "%b",
            ('M', 2) => "%m",
            ('M', 1) => "%-m",
            ('D', 4) => "%j",
            ('D', 2) => "%d",
            ('D', 1) => "%-d",
            ('d', 4) => "%A",
            ('d', 3) => "%a",
            ('H', 2) => "%H",
            ('H', 1) => "%-H",
            ('h', 2) => "%I",
            ('h', 1) => "%-I",
            ('m', 2) => "%M",
            ('s', 2) => "%S",
            ('S', 3) => "%3f",
            ('A', 1) => "%p",
            ('Z', 2) => "%z",
            ('Z', 1) => "%:z",
            _ => {
                for _ in 0..run {
                    if c == '%' {
                        result.push_str("%%");
                    } else {
                        result.push(c);
                    }
                }
                continue;
            }
        };
        result.push_str(spec);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date, "YYYY/MM/DD HH:mm:ss"), "2024/01/15 10:30:00");
        assert_eq!(format_date(&date, "dddd, MMM D"), "Monday, Jan 15");
    }

    #[test]
    fn test_pretty_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(pretty_date(&date), "March 1, 2024");

        let date = Utc.with_ymd_and_hms(2023, 12, 25, 23, 59, 59).unwrap();
        assert_eq!(pretty_date(&date), "December 25, 2023");
    }

    #[test]
    fn test_iso_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(iso_date(&date), "2024-03-01T00:00:00.000Z");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("MMMM D, YYYY"), "%B %-d, %Y");
        assert_eq!(moment_to_chrono_format("100%"), "100%%");
    }
}
