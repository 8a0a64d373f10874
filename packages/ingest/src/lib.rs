#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fire incident cleaning.
//!
//! Takes the raw header-keyed CSV records and produces typed
//! [`FireIncident`] rows. Cleaning is silent by design: rows with
//! unparseable coordinates or out-of-range wards are dropped, not errored.
//! Drop counts are captured in a [`CleanSummary`] so the filtering stays
//! observable instead of vanishing into the row stream.

use chrono::{DateTime, NaiveDateTime, Utc};
use fire_map_fire_models::{FireIncident, WardKey};
use serde::{Deserialize, Serialize};

/// CSV column holding the incident latitude.
pub const COL_LATITUDE: &str = "Latitude";

/// CSV column holding the incident longitude.
pub const COL_LONGITUDE: &str = "Longitude";

/// CSV column holding the raw ward number.
pub const COL_WARD: &str = "Incident_Ward";

/// CSV column holding the final incident type classification.
pub const COL_INCIDENT_TYPE: &str = "Final_Incident_Type";

/// CSV column holding the alarm timestamp.
pub const COL_ALARM_TIME: &str = "TFS_Alarm_Time";

/// Counts of rows dropped during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanSummary {
    /// Rows in the raw incident table.
    pub total_rows: u64,
    /// Rows dropped because latitude or longitude was missing or
    /// unparseable.
    pub missing_coordinates: u64,
    /// Rows dropped because the ward was missing, unparseable, or outside
    /// 1-25.
    pub invalid_ward: u64,
    /// Rows surviving into the cleaned table.
    pub cleaned: u64,
}

/// Cleans raw incident records into typed rows.
///
/// Steps, in order: coerce latitude/longitude (unparseable becomes
/// missing), drop rows missing either coordinate, coerce the ward field,
/// keep only wards in 1-25, normalize the survivors into [`WardKey`].
/// Dropped rows are counted in the returned [`CleanSummary`], never
/// reported as errors.
#[must_use]
pub fn clean_incidents(records: &[serde_json::Value]) -> (Vec<FireIncident>, CleanSummary) {
    let mut incidents = Vec::with_capacity(records.len());
    let mut missing_coordinates = 0u64;
    let mut invalid_ward = 0u64;

    for record in records {
        let latitude = field_f64(record, COL_LATITUDE);
        let longitude = field_f64(record, COL_LONGITUDE);

        // Coordinate filtering runs first: a row missing either coordinate
        // is dropped before its ward is even looked at, so a row failing
        // both checks lands in the coordinate bucket only.
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            missing_coordinates += 1;
            continue;
        };

        let Some(ward) = field_i64(record, COL_WARD).and_then(WardKey::new) else {
            invalid_ward += 1;
            continue;
        };

        let alarm_time_raw = field_str(record, COL_ALARM_TIME).map(ToOwned::to_owned);
        let alarm_time = alarm_time_raw.as_deref().and_then(parse_alarm_time);

        incidents.push(FireIncident {
            latitude,
            longitude,
            ward,
            incident_type: field_str(record, COL_INCIDENT_TYPE).map(ToOwned::to_owned),
            alarm_time,
            alarm_time_raw,
        });
    }

    let summary = CleanSummary {
        total_rows: records.len() as u64,
        missing_coordinates,
        invalid_ward,
        cleaned: incidents.len() as u64,
    };

    log::info!(
        "Cleaned incidents: {} of {} rows kept ({} missing coordinates, {} invalid ward)",
        summary.cleaned,
        summary.total_rows,
        summary.missing_coordinates,
        summary.invalid_ward,
    );

    (incidents, summary)
}

/// Parses an alarm timestamp (ISO 8601, with or without fractional
/// seconds).
#[must_use]
pub fn parse_alarm_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

/// Reads a non-empty string field from a record.
fn field_str<'a>(record: &'a serde_json::Value, name: &str) -> Option<&'a str> {
    record.get(name).and_then(serde_json::Value::as_str).filter(|s| !s.is_empty())
}

/// Coerces a field to `f64`, treating missing and unparseable values the
/// same way.
fn field_f64(record: &serde_json::Value, name: &str) -> Option<f64> {
    match record.get(name)? {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Coerces a field to an integer, accepting both `"7"` and `"7.0"` forms
/// (the upstream export renders the ward column inconsistently).
#[allow(clippy::cast_possible_truncation)]
fn field_i64(record: &serde_json::Value, name: &str) -> Option<i64> {
    match record.get(name)? {
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        serde_json::Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(lat: &str, lon: &str, ward: &str) -> serde_json::Value {
        json!({
            COL_LATITUDE: lat,
            COL_LONGITUDE: lon,
            COL_WARD: ward,
            COL_INCIDENT_TYPE: "01 - Fire",
            COL_ALARM_TIME: "2024-01-15T14:30:00",
        })
    }

    #[test]
    fn keeps_valid_rows() {
        let records = vec![record("43.7", "-79.4", "7")];
        let (incidents, summary) = clean_incidents(&records);
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].ward.to_string(), "07");
        assert_eq!(summary.cleaned, 1);
        assert!(incidents[0].alarm_time.is_some());
    }

    #[test]
    fn drops_rows_with_unparseable_coordinates() {
        let records = vec![
            record("not-a-number", "-79.4", "7"),
            record("43.7", "", "7"),
            record("43.7", "-79.4", "7"),
        ];
        let (incidents, summary) = clean_incidents(&records);
        assert_eq!(incidents.len(), 1);
        assert_eq!(summary.missing_coordinates, 2);
    }

    #[test]
    fn drops_rows_with_out_of_range_or_unparseable_wards() {
        let records = vec![
            record("43.7", "-79.4", "0"),
            record("43.7", "-79.4", "26"),
            record("43.7", "-79.4", "NA"),
            record("43.7", "-79.4", "25"),
        ];
        let (incidents, summary) = clean_incidents(&records);
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].ward.to_string(), "25");
        assert_eq!(summary.invalid_ward, 3);
    }

    #[test]
    fn missing_coordinates_counted_before_ward_validity() {
        // A row failing both filters lands in the coordinate bucket only.
        let records = vec![record("", "", "99")];
        let (_, summary) = clean_incidents(&records);
        assert_eq!(summary.missing_coordinates, 1);
        assert_eq!(summary.invalid_ward, 0);
    }

    #[test]
    fn accepts_float_rendered_ward_numbers() {
        let records = vec![record("43.7", "-79.4", "7.0")];
        let (incidents, _) = clean_incidents(&records);
        assert_eq!(incidents[0].ward.to_string(), "07");
    }

    #[test]
    fn keeps_raw_alarm_time_when_unparseable() {
        let mut rec = record("43.7", "-79.4", "7");
        rec[COL_ALARM_TIME] = json!("sometime in January");
        let (incidents, _) = clean_incidents(&[rec]);
        assert!(incidents[0].alarm_time.is_none());
        assert_eq!(incidents[0].alarm_time_raw.as_deref(), Some("sometime in January"));
    }

    #[test]
    fn three_row_scenario_keeps_two_rows_keyed_07() {
        let records = vec![
            record("43.70", "-79.40", "7"),
            record("43.71", "-79.41", "7"),
            record("43.72", "-79.42", "99"),
        ];
        let (incidents, summary) = clean_incidents(&records);
        assert_eq!(incidents.len(), 2);
        assert!(incidents.iter().all(|i| i.ward.to_string() == "07"));
        assert_eq!(summary.invalid_ward, 1);
    }
}
