#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Declarative map render specs for the dashboard.
//!
//! Builds the three figures (incident points, total-fires choropleth,
//! fires-per-capita choropleth) as serde-serializable structures in the
//! shape Plotly.js consumes directly. Figure building is a pure function of
//! the pipeline outputs; nothing here fetches or computes.

pub mod spec;

use fire_map_analytics::WardRate;
use fire_map_fire_models::FireIncident;
use fire_map_geography::{WARD_CODE_PROPERTY, WardBoundaries};
use strum_macros::{Display, EnumString};

use crate::spec::{Center, Colorbar, Layout, MapFigure, Marker, Trace};

/// Toronto city hall, the map center for every view.
pub const TORONTO_CENTER: Center = Center { lat: 43.6532, lon: -79.3832 };

/// Base map style for every view.
pub const MAP_STYLE: &str = "carto-positron";

/// Rendered figure height in pixels.
const FIGURE_HEIGHT: u32 = 650;

/// Zoom level for the incident point view.
const POINT_ZOOM: f64 = 10.0;

/// Zoom level for the ward choropleth views.
const CHOROPLETH_ZOOM: f64 = 9.0;

/// The three dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ViewKind {
    /// Raw incident points.
    Points,
    /// Total fires per ward.
    Total,
    /// Fires per 1,000 residents per ward.
    Rate,
}

impl ViewKind {
    /// All views, in tab order.
    pub const ALL: &[Self] = &[Self::Points, Self::Total, Self::Rate];

    /// Human-readable tab title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Points => "Points",
            Self::Total => "Total fires",
            Self::Rate => "Fires / 1,000 pop",
        }
    }
}

/// The three precomputed figures, built once at startup.
#[derive(Debug, Clone)]
pub struct Figures {
    /// Raw incident point map.
    pub points: MapFigure,
    /// Total-fires choropleth.
    pub total: MapFigure,
    /// Fires-per-capita choropleth.
    pub rate: MapFigure,
}

impl Figures {
    /// Returns the precomputed figure for a view.
    ///
    /// Total over [`ViewKind`]; each label always returns the same figure
    /// for the lifetime of the process.
    #[must_use]
    pub const fn select(&self, view: ViewKind) -> &MapFigure {
        match view {
            ViewKind::Points => &self.points,
            ViewKind::Total => &self.total,
            ViewKind::Rate => &self.rate,
        }
    }
}

/// Builds all three figures from the pipeline outputs.
#[must_use]
pub fn build_figures(
    boundaries: &WardBoundaries,
    incidents: &[FireIncident],
    rates: &[WardRate],
) -> Figures {
    Figures {
        points: build_point_figure(incidents),
        total: build_count_figure(boundaries, rates),
        rate: build_rate_figure(boundaries, rates),
    }
}

/// Builds the raw incident point map.
#[must_use]
pub fn build_point_figure(incidents: &[FireIncident]) -> MapFigure {
    let text = incidents.iter().map(point_hover).collect();

    MapFigure {
        data: vec![Trace::ScatterMap {
            lat: incidents.iter().map(|i| i.latitude).collect(),
            lon: incidents.iter().map(|i| i.longitude).collect(),
            mode: "markers".to_owned(),
            marker: Marker { size: Some(4.0), opacity: None },
            text,
            hoverinfo: "text".to_owned(),
        }],
        layout: Layout::map(MAP_STYLE, TORONTO_CENTER, POINT_ZOOM, FIGURE_HEIGHT),
    }
}

/// Builds the total-fires choropleth.
///
/// Colored by raw count, but built from the joined rate table so the hover
/// can show population alongside the count.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_count_figure(boundaries: &WardBoundaries, rates: &[WardRate]) -> MapFigure {
    MapFigure {
        data: vec![Trace::ChoroplethMap {
            geojson: boundaries.collection_json(),
            locations: rates.iter().map(|r| r.ward.to_string()).collect(),
            z: rates.iter().map(|r| r.count as f64).collect(),
            featureidkey: format!("properties.{WARD_CODE_PROPERTY}"),
            colorscale: "OrRd".to_owned(),
            marker: Marker { size: None, opacity: Some(0.6) },
            text: rates.iter().map(count_hover).collect(),
            hoverinfo: "text".to_owned(),
            colorbar: Colorbar { title: "Fires".to_owned() },
        }],
        layout: Layout::map(MAP_STYLE, TORONTO_CENTER, CHOROPLETH_ZOOM, FIGURE_HEIGHT),
    }
}

/// Builds the fires-per-capita choropleth.
#[must_use]
pub fn build_rate_figure(boundaries: &WardBoundaries, rates: &[WardRate]) -> MapFigure {
    MapFigure {
        data: vec![Trace::ChoroplethMap {
            geojson: boundaries.collection_json(),
            locations: rates.iter().map(|r| r.ward.to_string()).collect(),
            z: rates.iter().map(|r| r.per_1000).collect(),
            featureidkey: format!("properties.{WARD_CODE_PROPERTY}"),
            colorscale: "YlGnBu".to_owned(),
            marker: Marker { size: None, opacity: Some(0.75) },
            text: rates.iter().map(rate_hover).collect(),
            hoverinfo: "text".to_owned(),
            colorbar: Colorbar { title: "Fires / 1,000 pop".to_owned() },
        }],
        layout: Layout::map(MAP_STYLE, TORONTO_CENTER, CHOROPLETH_ZOOM, FIGURE_HEIGHT),
    }
}

/// Hover text for a single incident point.
fn point_hover(incident: &FireIncident) -> String {
    let mut parts = vec![format!("Ward {}", incident.ward)];

    if let Some(kind) = &incident.incident_type {
        parts.push(kind.clone());
    }

    if let Some(at) = incident.alarm_time {
        parts.push(at.format("%Y-%m-%d %H:%M").to_string());
    } else if let Some(raw) = &incident.alarm_time_raw {
        parts.push(raw.clone());
    }

    parts.join("<br>")
}

/// Hover text for a ward in the total-fires view.
fn count_hover(rate: &WardRate) -> String {
    format!(
        "Ward {}<br>Fires: {}<br>Population: {:.0}",
        rate.ward, rate.count, rate.population
    )
}

/// Hover text for a ward in the per-capita view.
fn rate_hover(rate: &WardRate) -> String {
    format!(
        "Ward {}<br>Fires / 1,000 pop: {:.2}<br>Fires: {}<br>Population: {:.0}",
        rate.ward, rate.per_1000, rate.count, rate.population
    )
}
