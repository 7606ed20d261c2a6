//! `HH:MM` time-of-day helpers shared by routine and task records.
//!
//! # Invariants
//! - Times are always rendered zero-padded as `HH:MM`.
//! - Seconds are never stored; parsing rejects anything but `HH:MM`.

use chrono::{NaiveTime, Timelike};

/// Display/storage format for every time-of-day in core records.
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Parses a strict `HH:MM` value.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    if trimmed.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(trimmed, CLOCK_FORMAT).ok()
}

/// Formats a time as zero-padded `HH:MM`.
pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Minutes elapsed since midnight.
pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Serde adapter for `Option<NaiveTime>` stored as `"HH:MM"` or absent.
pub mod option {
    use super::{format_clock, parse_clock};
    use chrono::NaiveTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&format_clock(*time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => parse_clock(text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid time of day `{text}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format_clock, minutes_since_midnight, parse_clock};

    #[test]
    fn parse_clock_accepts_padded_values_only() {
        assert!(parse_clock("09:50").is_some());
        assert!(parse_clock("23:59").is_some());
        assert!(parse_clock("9:50").is_none());
        assert!(parse_clock("24:00").is_none());
        assert!(parse_clock("--:--").is_none());
    }

    #[test]
    fn minutes_and_format_agree() {
        let time = parse_clock("09:50").unwrap();
        assert_eq!(minutes_since_midnight(time), 590);
        assert_eq!(format_clock(time), "09:50");
    }
}
