#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward boundary `GeoJSON` extraction.
//!
//! The boundary file host is known to wrap the `GeoJSON` payload in
//! non-JSON framing, so parsing is two-stage: a strict parse first, then a
//! bounded recovery that extracts the largest brace-delimited span. Ward
//! identifiers are read from feature properties and normalized into
//! [`WardKey`] so they join against incident and population data.

use fire_map_fire_models::WardKey;
use geojson::FeatureCollection;

/// Feature property holding the zero-padded ward code (`"01"` .. `"25"`).
pub const WARD_CODE_PROPERTY: &str = "AREA_SHORT_CODE";

/// Errors that can occur while parsing ward boundaries.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// No brace-delimited span was found in the downloaded text.
    #[error("No JSON object found in downloaded file")]
    NoJsonObject,

    /// The payload (or recovered span) is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] Box<geojson::Error>),

    /// A boundary feature has no usable ward code property.
    #[error("Ward code error: {message}")]
    MissingWardCode {
        /// Description of the offending feature.
        message: String,
    },
}

/// Ward boundary polygons plus the normalized keys found in them.
#[derive(Debug, Clone)]
pub struct WardBoundaries {
    /// The parsed boundary feature collection, kept intact for embedding
    /// in choropleth figures.
    pub collection: FeatureCollection,
    /// Ward keys in feature order.
    pub wards: Vec<WardKey>,
}

impl WardBoundaries {
    /// Serializes the boundary collection to a JSON value for embedding in
    /// a render spec.
    ///
    /// # Panics
    ///
    /// Never panics: a parsed [`FeatureCollection`] always serializes.
    #[must_use]
    pub fn collection_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.collection).unwrap_or(serde_json::Value::Null)
    }
}

/// Parses a possibly-wrapped text payload into a [`FeatureCollection`].
///
/// Tries a strict parse of the whole payload first. If that fails, falls
/// back to the span from the first `{` through the last `}` (greedy), which
/// defends against hosts that wrap the payload in HTML or log framing.
///
/// # Errors
///
/// Returns [`GeoError::NoJsonObject`] if no brace-delimited span exists,
/// or [`GeoError::Geojson`] if the span is not valid `GeoJSON`.
pub fn extract_feature_collection(raw: &str) -> Result<FeatureCollection, GeoError> {
    match raw.parse::<FeatureCollection>() {
        Ok(fc) => Ok(fc),
        Err(strict_err) => {
            let start = raw.find('{').ok_or(GeoError::NoJsonObject)?;
            let end = raw.rfind('}').ok_or(GeoError::NoJsonObject)?;
            if end < start {
                return Err(GeoError::NoJsonObject);
            }

            log::debug!(
                "Strict GeoJSON parse failed ({strict_err}), retrying on brace-delimited span"
            );

            raw[start..=end]
                .parse::<FeatureCollection>()
                .map_err(|e| GeoError::Geojson(Box::new(e)))
        }
    }
}

/// Reads the ward code from each feature's properties into a [`WardKey`].
///
/// # Errors
///
/// Returns [`GeoError::MissingWardCode`] if any feature lacks a parseable
/// `AREA_SHORT_CODE` property. A silently skipped polygon would silently
/// drop a ward from every choropleth, so this is fatal.
pub fn ward_boundaries(collection: FeatureCollection) -> Result<WardBoundaries, GeoError> {
    let mut wards = Vec::with_capacity(collection.features.len());

    for (i, feature) in collection.features.iter().enumerate() {
        let code = feature
            .property(WARD_CODE_PROPERTY)
            .ok_or_else(|| GeoError::MissingWardCode {
                message: format!("feature {i} has no {WARD_CODE_PROPERTY} property"),
            })?;

        let ward = match code {
            serde_json::Value::String(s) => s.parse::<WardKey>().ok(),
            serde_json::Value::Number(n) => n.as_i64().and_then(WardKey::new),
            _ => None,
        }
        .ok_or_else(|| GeoError::MissingWardCode {
            message: format!("feature {i} has unparseable ward code {code}"),
        })?;

        wards.push(ward);
    }

    log::info!("Parsed {} ward boundary polygons", wards.len());

    Ok(WardBoundaries { collection, wards })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ward_feature_collection() -> String {
        r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"AREA_SHORT_CODE": "07", "AREA_NAME": "Humber River-Black Creek"},
                    "geometry": {"type": "Polygon", "coordinates": [[[-79.5, 43.7], [-79.5, 43.8], [-79.4, 43.8], [-79.5, 43.7]]]}
                },
                {
                    "type": "Feature",
                    "properties": {"AREA_SHORT_CODE": "13", "AREA_NAME": "Toronto Centre"},
                    "geometry": {"type": "Polygon", "coordinates": [[[-79.4, 43.6], [-79.4, 43.7], [-79.3, 43.7], [-79.4, 43.6]]]}
                }
            ]
        }"#
        .to_owned()
    }

    #[test]
    fn parses_clean_payload_strictly() {
        let fc = extract_feature_collection(&ward_feature_collection()).unwrap();
        assert_eq!(fc.features.len(), 2);
    }

    #[test]
    fn recovers_payload_wrapped_in_framing() {
        let wrapped = format!("<!-- served by cdn -->\n{}\ntrailing garbage", ward_feature_collection());
        let fc = extract_feature_collection(&wrapped).unwrap();
        assert_eq!(fc.features.len(), 2);
    }

    #[test]
    fn errors_when_no_json_object_present() {
        let err = extract_feature_collection("plain text, no json here").unwrap_err();
        assert!(matches!(err, GeoError::NoJsonObject));
    }

    #[test]
    fn errors_on_invalid_json_span() {
        let err = extract_feature_collection("prefix { not json } suffix").unwrap_err();
        assert!(matches!(err, GeoError::Geojson(_)));
    }

    #[test]
    fn extracts_ward_keys_in_feature_order() {
        let fc = extract_feature_collection(&ward_feature_collection()).unwrap();
        let boundaries = ward_boundaries(fc).unwrap();
        let keys: Vec<String> = boundaries.wards.iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["07", "13"]);
    }

    #[test]
    fn errors_on_feature_without_ward_code() {
        let fc: FeatureCollection = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"AREA_NAME": "Mystery"}, "geometry": null}
            ]
        }"#
        .parse()
        .unwrap();

        let err = ward_boundaries(fc).unwrap_err();
        assert!(matches!(err, GeoError::MissingWardCode { .. }));
    }
}
