//! Timestamp parsing shared by the wide-column rows and the documents.
//!
//! Inputs arrive as bare dates (`2024-11-20`), date + minutes
//! (`2024-11-26 20:00`), full ISO-8601 datetimes or RFC 3339 strings with an
//! offset. Everything is normalised to a naive UTC timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{Result, StatsError};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Wire format used when serialising timestamps. Fractional seconds are
/// written only when present; offsets are already folded into UTC.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Parse a timestamp in any of the accepted layouts.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| StatsError::invalid("timestamp", format!("unrecognised value '{}'", input)))
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(WIRE_FORMAT).to_string()
}

/// Serde adapter for required timestamps.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(D::Error::custom)
    }
}

/// Serde adapter for optional timestamps; `null` and a missing field both map to `None`.
pub mod option_timestamp {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        ts: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_str(&super::format_timestamp(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_timestamp(&raw)
                .map(Some)
                .map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}
