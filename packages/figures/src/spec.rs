//! Serializable render-spec types.
//!
//! These structures serialize to exactly the JSON shape Plotly.js expects
//! for a figure: a `data` array of traces plus a `layout` object. The
//! frontend hands the serialized spec straight to `Plotly.newPlot`.

use serde::Serialize;

/// A complete figure: traces plus layout.
#[derive(Debug, Clone, Serialize)]
pub struct MapFigure {
    /// Trace list. Every view here uses exactly one trace.
    pub data: Vec<Trace>,
    /// Map layout (base style, center, zoom, margins).
    pub layout: Layout,
}

/// A single Plotly trace.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Trace {
    /// Point markers on a tiled base map.
    #[serde(rename = "scattermapbox")]
    ScatterMap {
        /// Marker latitudes.
        lat: Vec<f64>,
        /// Marker longitudes.
        lon: Vec<f64>,
        /// Plotly trace mode (always `"markers"` here).
        mode: String,
        /// Marker styling.
        marker: Marker,
        /// Per-marker hover text.
        text: Vec<String>,
        /// Hover content selector.
        hoverinfo: String,
    },

    /// Colored polygons bound to an embedded `GeoJSON` collection.
    #[serde(rename = "choroplethmapbox")]
    ChoroplethMap {
        /// The boundary feature collection, embedded in the trace.
        geojson: serde_json::Value,
        /// Feature identifiers, matched against `featureidkey`.
        locations: Vec<String>,
        /// Color values, one per location.
        z: Vec<f64>,
        /// Property path identifying features (e.g.
        /// `properties.AREA_SHORT_CODE`).
        featureidkey: String,
        /// Named Plotly color scale.
        colorscale: String,
        /// Polygon styling.
        marker: Marker,
        /// Per-polygon hover text.
        text: Vec<String>,
        /// Hover content selector.
        hoverinfo: String,
        /// Color bar legend.
        colorbar: Colorbar,
    },
}

/// Marker or polygon styling.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Marker {
    /// Marker size in pixels (point traces only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    /// Fill opacity (choropleth traces only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Color bar legend configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Colorbar {
    /// Legend title.
    pub title: String,
}

/// Figure layout.
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    /// Base map configuration.
    pub mapbox: Mapbox,
    /// Outer margins, zeroed so the map fills its container.
    pub margin: Margin,
    /// Figure height in pixels.
    pub height: u32,
}

impl Layout {
    /// Builds a zero-margin map layout.
    #[must_use]
    pub fn map(style: &str, center: Center, zoom: f64, height: u32) -> Self {
        Self {
            mapbox: Mapbox { style: style.to_owned(), center, zoom },
            margin: Margin::ZERO,
            height,
        }
    }
}

/// Tiled base map configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Mapbox {
    /// Base tile style name (token-free styles only).
    pub style: String,
    /// Initial map center.
    pub center: Center,
    /// Initial zoom level.
    pub zoom: f64,
}

/// A map center coordinate.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Center {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

/// Figure margins.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    /// Top margin in pixels.
    pub t: u32,
    /// Right margin in pixels.
    pub r: u32,
    /// Left margin in pixels.
    pub l: u32,
    /// Bottom margin in pixels.
    pub b: u32,
}

impl Margin {
    /// All four margins zeroed.
    pub const ZERO: Self = Self { t: 0, r: 0, l: 0, b: 0 };
}
