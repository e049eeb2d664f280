//! Types shared by several models

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Occupancy of a unit, or of a house-type property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "occupancy_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OccupancyStatus {
    #[default]
    Vacant,
    Occupied,
}

impl OccupancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OccupancyStatus::Vacant => "VACANT",
            OccupancyStatus::Occupied => "OCCUPIED",
        }
    }

    /// Parses a status, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "VACANT" => Some(OccupancyStatus::Vacant),
            "OCCUPIED" => Some(OccupancyStatus::Occupied),
            _ => None,
        }
    }
}

/// Deserializes a field that may be absent, `null`, or a value
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an
/// `Option<Option<T>>`: absent → `None` (leave unchanged), `null` →
/// `Some(None)` (clear), value → `Some(Some(v))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_date_input(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

/// Deserializes an optional date field; an empty string counts as absent
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_date_input(raw.trim())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw))),
    }
}

/// `nullable` for date fields, with the same parsing as `optional_date`
pub fn nullable_date<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    optional_date(deserializer).map(Some)
}
