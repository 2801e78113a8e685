use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M",
];

/// The maximum generation date of a dataset, used to tell whether the
/// staging copy is behind the upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FreshnessMarker(NaiveDateTime);

impl FreshnessMarker {
    /// Lenient parse: anything that does not look like a date or
    /// date-time is treated as an absent marker.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(FreshnessMarker(dt.naive_utc()));
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(raw, format) {
                return Some(FreshnessMarker(dt.naive_utc()));
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(FreshnessMarker(dt));
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(FreshnessMarker)
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }
}

impl fmt::Display for FreshnessMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> FreshnessMarker {
        FreshnessMarker(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    #[test]
    fn test_parse_accepted_shapes() {
        assert_eq!(FreshnessMarker::parse("2024-06-01"), Some(ymd(2024, 6, 1)));
        assert_eq!(FreshnessMarker::parse("2024-06-01T00:00:00"), Some(ymd(2024, 6, 1)));
        assert_eq!(FreshnessMarker::parse("2024-06-01 00:00:00"), Some(ymd(2024, 6, 1)));
        assert_eq!(FreshnessMarker::parse("2024-06-01 00:00:00+00"), Some(ymd(2024, 6, 1)));
        assert_eq!(FreshnessMarker::parse("2024-06-01T00:00:00Z"), Some(ymd(2024, 6, 1)));
        assert_eq!(
            FreshnessMarker::parse(" 2024-06-01T00:00:00.000 "),
            Some(ymd(2024, 6, 1))
        );
    }

    #[test]
    fn test_parse_garbage_is_absent() {
        assert_eq!(FreshnessMarker::parse(""), None);
        assert_eq!(FreshnessMarker::parse("not a date"), None);
        assert_eq!(FreshnessMarker::parse("2024-13-45"), None);
    }

    #[test]
    fn test_ordering() {
        assert!(ymd(2024, 5, 1) < ymd(2024, 6, 1));
        assert!(ymd(2024, 6, 1) <= ymd(2024, 6, 1));
    }
}
