//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Moment.js tokens and their chrono equivalents, longest first so that
/// `MMMM` wins over `MMM` and `MM`.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("MMMM", "%B"),
    ("DDDD", "%j"),
    ("dddd", "%A"),
    ("MMM", "%b"),
    ("ddd", "%a"),
    ("SSS", "%3f"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("ZZ", "%z"),
    ("M", "%-m"),
    ("D", "%-d"),
    ("H", "%-H"),
    ("h", "%-I"),
    ("m", "%-M"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("Z", "%:z"),
];

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "MMM D, YYYY") // -> "Jun 1, 2020"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Format a date in ISO 8601 / XML format
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Generate a <time> HTML element
pub fn time_tag<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        r#"<time datetime="{}">{}</time>"#,
        date_xml(date),
        format_date(date, format)
    )
}

/// Convert a Moment.js format string to a chrono format string.
///
/// Text inside `[...]` is copied literally, and a literal `%` is escaped.
fn moment_to_chrono_format(format: &str) -> String {
    let mut result = String::with_capacity(format.len() * 2);
    let mut rest = format;

    'outer: while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                push_literal(&mut result, &rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        for (token, replacement) in TOKENS {
            if let Some(stripped) = rest.strip_prefix(token) {
                result.push_str(replacement);
                rest = stripped;
                continue 'outer;
            }
        }

        push_literal(&mut result, &rest[..c.len_utf8()]);
        rest = &rest[c.len_utf8()..];
    }

    result
}

fn push_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_format_post_date() {
        let date = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(format_date(&date, "MMM D, YYYY"), "Jun 1, 2020");
    }

    #[test]
    fn test_format_date_keeps_author_offset() {
        // 23:30 in UTC-5 is already June 2nd in UTC
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let date = offset.with_ymd_and_hms(2020, 6, 1, 23, 30, 0).unwrap();
        assert_eq!(format_date(&date, "MMM D, YYYY"), "Jun 1, 2020");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date, "YYYY/MM/DD"), "2024/01/15");
        assert_eq!(format_date(&date, "MMMM D"), "January 15");
        assert_eq!(format_date(&date, "dddd"), "Monday");
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
        assert_eq!(moment_to_chrono_format("MMM D, YYYY"), "%b %-d, %Y");
        assert_eq!(moment_to_chrono_format("[Day] D"), "Day %-d");
        assert_eq!(moment_to_chrono_format("100%"), "100%%");
    }

    #[test]
    fn test_time_tag() {
        let date = Utc.with_ymd_and_hms(2020, 6, 1, 8, 0, 0).unwrap();
        assert_eq!(
            time_tag(&date, "MMM D, YYYY"),
            r#"<time datetime="2020-06-01T08:00:00+00:00">Jun 1, 2020</time>"#
        );
    }
}
