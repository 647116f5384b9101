//! Date utilities: deadline parsing, whole-day arithmetic, canonical rendering.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Fixed format of member task dates (`created_date`, `completed_date`, `due_date`).
pub const RECORD_DATE_FORMAT: &str = "%Y-%m-%d";

const DEADLINE_DATE_FORMATS: [&str; 2] = [RECORD_DATE_FORMAT, "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Parse a task deadline. Accepts a bare date (midnight, `-` or `/`
/// separated), a naive datetime, or RFC 3339 (kept at its local wall-clock time).
pub fn parse_deadline(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Some(d) = DEADLINE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return d.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn parse_record_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, RECORD_DATE_FORMAT)
}

/// Whole days from `now` until `deadline`, never negative.
pub fn days_left(deadline: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (deadline - now).num_days().max(0)
}

/// Canonical date-only rendering used in responses.
pub fn format_date(dt: NaiveDateTime) -> String {
    dt.date().format(RECORD_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn parses_supported_deadline_forms() {
        assert_eq!(parse_deadline("2025-05-15"), Some(at(2025, 5, 15, 0)));
        assert_eq!(parse_deadline("2025-05-15T09:00:00"), Some(at(2025, 5, 15, 9)));
        assert_eq!(parse_deadline("2025-05-15 09:00:00"), Some(at(2025, 5, 15, 9)));
        assert_eq!(
            parse_deadline("2025-05-15T09:00:00+07:00"),
            Some(at(2025, 5, 15, 9))
        );
        assert_eq!(parse_deadline("not-a-date"), None);
        assert_eq!(parse_deadline(""), None);
        assert_eq!(parse_deadline("2025-02-30"), None);
    }

    #[test]
    fn slash_separated_deadlines_parse() {
        assert_eq!(parse_deadline("2025/05/15"), Some(at(2025, 5, 15, 0)));
        assert_eq!(parse_deadline("2025/05/15 09:00"), Some(at(2025, 5, 15, 9)));
        assert_eq!(parse_deadline("2025/05/15T09:00:00"), Some(at(2025, 5, 15, 9)));
        assert_eq!(parse_deadline("2025/5/15"), Some(at(2025, 5, 15, 0)));
        assert_eq!(parse_deadline("2025/02/30"), None);
        // record dates stay strict
        assert!(parse_record_date("2025/05/15").is_err());
    }

    #[test]
    fn days_left_truncates_partial_days_and_clamps_past() {
        let now = at(2025, 5, 10, 15);
        assert_eq!(days_left(at(2025, 5, 11, 0), now), 0);
        assert_eq!(days_left(at(2025, 5, 20, 0), now), 9);
        assert_eq!(days_left(at(2024, 1, 1, 0), now), 0);
    }

    #[test]
    fn format_date_drops_time() {
        assert_eq!(format_date(at(2025, 5, 15, 13)), "2025-05-15");
    }
}
