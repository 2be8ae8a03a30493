//! Floating wall-clock dates.
//!
//! Dates arrive from clients in several shapes. Whatever the shape, the stored
//! value is the wall-clock time as the user authored it: an offset suffix is
//! dropped, not applied, so `2024-01-15T23:30:00-05:00` stays on January 15th.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a client-supplied date or date-time as a floating wall-clock value
pub fn parse_floating(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(input) {
        return Some(with_offset.naive_local());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Midnight at the start of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDateTime {
    date.with_day0(0).unwrap_or(date).and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_offset_is_stripped_not_applied() {
        assert_eq!(parse_floating("2024-01-15T23:30:00-05:00"), Some(at(2024, 1, 15, 23, 30)));
        assert_eq!(parse_floating("2024-01-15T23:30:00+09:00"), Some(at(2024, 1, 15, 23, 30)));
        assert_eq!(parse_floating("2024-01-15T23:30:00Z"), Some(at(2024, 1, 15, 23, 30)));
    }

    #[test]
    fn test_naive_shapes() {
        assert_eq!(parse_floating("2024-01-15T23:30:00"), Some(at(2024, 1, 15, 23, 30)));
        assert_eq!(parse_floating("2024-01-15T23:30"), Some(at(2024, 1, 15, 23, 30)));
        assert_eq!(parse_floating("2024-01-15 07:05:00"), Some(at(2024, 1, 15, 7, 5)));
        assert_eq!(parse_floating(" 2024-01-15 "), Some(at(2024, 1, 15, 0, 0)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_floating(""), None);
        assert_eq!(parse_floating("yesterday"), None);
        assert_eq!(parse_floating("2024-02-30"), None);
    }

    #[test]
    fn test_month_start() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(month_start(date), at(2024, 2, 1, 0, 0));
    }
}
