#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Fire incident and ward key types.
//!
//! This crate defines the canonical ward key format used across the entire
//! fire-map system. The incident CSV, the ward boundary `GeoJSON`, and the
//! census population spreadsheet all identify wards differently at the
//! surface; every pipeline stage normalizes into [`WardKey`] so that joins
//! and choropleth coloring resolve on byte-identical strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of wards in the city. Ward numbers run 1 through this value.
pub const WARD_COUNT: u8 = 25;

/// A normalized ward identifier.
///
/// Stored as the ward number (1-25) and rendered as exactly two ASCII
/// digits, zero-padded (`"01"` .. `"25"`). The rendered form must match the
/// `AREA_SHORT_CODE` property of the ward boundary features byte for byte;
/// a format mismatch silently drops data from every joined view, so all
/// construction goes through the checked constructors here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WardKey(u8);

impl WardKey {
    /// Creates a ward key from a ward number.
    ///
    /// Returns `None` for numbers outside 1-25.
    #[must_use]
    pub fn new(number: i64) -> Option<Self> {
        u8::try_from(number)
            .ok()
            .filter(|n| (1..=WARD_COUNT).contains(n))
            .map(Self)
    }

    /// Returns the ward number (1-25).
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    /// Returns all ward keys in ascending order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        (1..=WARD_COUNT).map(Self).collect()
    }
}

impl std::fmt::Display for WardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl std::str::FromStr for WardKey {
    type Err = InvalidWardError;

    /// Parses either the zero-padded form (`"07"`) or a bare number (`"7"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidWardError { value: s.to_owned() })
    }
}

impl TryFrom<String> for WardKey {
    type Error = InvalidWardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<WardKey> for String {
    fn from(key: WardKey) -> Self {
        key.to_string()
    }
}

/// Error returned when a string or number cannot be interpreted as a ward
/// in the 1-25 domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidWardError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidWardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid ward '{}': expected a number 1-25", self.value)
    }
}

impl std::error::Error for InvalidWardError {}

/// A cleaned fire incident record.
///
/// Only rows with both coordinates present and a ward in the valid domain
/// make it into this type; the cleaning rules live in `fire_map_ingest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FireIncident {
    /// Latitude in WGS84.
    pub latitude: f64,
    /// Longitude in WGS84.
    pub longitude: f64,
    /// Normalized ward key.
    pub ward: WardKey,
    /// Final incident type classification from the source data.
    pub incident_type: Option<String>,
    /// Alarm timestamp, when it parsed as ISO 8601.
    pub alarm_time: Option<DateTime<Utc>>,
    /// Raw alarm timestamp string, kept for hover display when parsing
    /// fails.
    pub alarm_time_raw: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_single_digit_ward_zero_padded() {
        assert_eq!(WardKey::new(7).unwrap().to_string(), "07");
    }

    #[test]
    fn formats_two_digit_ward_unchanged() {
        assert_eq!(WardKey::new(25).unwrap().to_string(), "25");
    }

    #[test]
    fn rejects_out_of_range_wards() {
        assert!(WardKey::new(0).is_none());
        assert!(WardKey::new(26).is_none());
        assert!(WardKey::new(99).is_none());
        assert!(WardKey::new(-3).is_none());
    }

    #[test]
    fn parses_padded_and_bare_forms() {
        let padded: WardKey = "07".parse().unwrap();
        let bare: WardKey = "7".parse().unwrap();
        assert_eq!(padded, bare);
        assert_eq!(padded.number(), 7);
    }

    #[test]
    fn normalization_is_idempotent() {
        let key = WardKey::new(13).unwrap();
        let reparsed: WardKey = key.to_string().parse().unwrap();
        assert_eq!(key, reparsed);
    }

    #[test]
    fn rejects_non_numeric_wards() {
        assert!("NA".parse::<WardKey>().is_err());
        assert!("".parse::<WardKey>().is_err());
    }

    #[test]
    fn all_covers_full_domain() {
        let all = WardKey::all();
        assert_eq!(all.len(), 25);
        assert_eq!(all.first().unwrap().to_string(), "01");
        assert_eq!(all.last().unwrap().to_string(), "25");
    }
}
