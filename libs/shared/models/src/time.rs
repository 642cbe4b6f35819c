//! Wall-clock string helpers shared by the schedule and appointment pages.
//!
//! Times travel as "HH:MM" in forms and "HH:MM:SS" on the wire; local
//! datetimes travel as "YYYY-MM-DDTHH:MM" in forms and gain seconds on submit.

use chrono::NaiveDate;

pub const DEFAULT_TIME_INPUT: &str = "08:00";

/// Appends ":00" to an "HH:MM" value; longer values pass through.
pub fn with_seconds(time: &str) -> String {
    if time.len() == 5 {
        format!("{}:00", time)
    } else {
        time.to_string()
    }
}

/// Backend time to form value. Missing values fall back to "08:00".
pub fn to_time_input(time: Option<&str>) -> String {
    match time {
        Some(value) if !value.is_empty() => value.chars().take(5).collect(),
        _ => DEFAULT_TIME_INPUT.to_string(),
    }
}

/// Appends seconds to a "YYYY-MM-DDTHH:MM" form value.
pub fn to_iso_datetime(local: &str) -> String {
    if local.len() == 16 {
        format!("{}:00", local)
    } else {
        local.to_string()
    }
}

/// Parses the date part of "YYYY-MM-DD" or "YYYY-MM-DDTHH:MM:SS".
pub fn parse_date_prefix(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Serde adapter for backend dates that may carry a time component.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date_prefix(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_seconds() {
        assert_eq!(with_seconds("08:00"), "08:00:00");
        assert_eq!(with_seconds("08:00:00"), "08:00:00");
        assert_eq!(with_seconds(""), "");
    }

    #[test]
    fn test_to_time_input() {
        assert_eq!(to_time_input(Some("17:30:00")), "17:30");
        assert_eq!(to_time_input(Some("")), "08:00");
        assert_eq!(to_time_input(None), "08:00");
    }

    #[test]
    fn test_to_iso_datetime() {
        assert_eq!(to_iso_datetime("2025-03-10T09:30"), "2025-03-10T09:30:00");
        assert_eq!(to_iso_datetime("2025-03-10T09:30:15"), "2025-03-10T09:30:15");
        assert_eq!(to_iso_datetime(""), "");
    }

    #[test]
    fn test_parse_date_prefix() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
        assert_eq!(parse_date_prefix("2025-12-25"), Some(expected));
        assert_eq!(parse_date_prefix("2025-12-25T00:00:00"), Some(expected));
        assert_eq!(parse_date_prefix("25/12/2025"), None);
    }
}
