//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date with a strftime-style format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "%Y-%m-%d") // -> "2024-01-15"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format(format).to_string()
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&date(), "%Y-%m-%d"), "2024-01-05");
        assert_eq!(format_date(&date(), "%Y/%m/%d"), "2024/01/05");
    }

    #[test]
    fn test_time_tag() {
        assert_eq!(
            time_tag(&date(), "%Y-%m-%d"),
            r#"<time datetime="2024-01-05T10:30:00+01:00">2024-01-05</time>"#
        );
    }
}
