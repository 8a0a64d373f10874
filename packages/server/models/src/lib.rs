#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the fire map server.
//!
//! These types are serialized to JSON for the dashboard frontend. They are
//! separate from the pipeline types to allow independent evolution of the
//! API contract.

use fire_map_analytics::{RateJoinSummary, WardCoverage};
use fire_map_ingest::CleanSummary;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// A selectable dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiView {
    /// View label, valid as a `/api/figure/{view}` path segment.
    pub value: String,
    /// Human-readable tab title.
    pub title: String,
}

/// Data-quality summary for the startup pipeline run.
///
/// Exposes the counts the cleaning and joining stages would otherwise
/// drop silently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    /// Row counts from incident cleaning.
    pub cleaning: CleanSummary,
    /// Number of distinct wards with at least one incident.
    pub wards_with_incidents: u64,
    /// Number of ward rows in the rate table.
    pub wards_with_rates: u64,
    /// Wards excluded from the rate join and why.
    pub rate_join: RateJoinSummary,
    /// Set differences between boundary polygons and counted wards.
    pub coverage: WardCoverage,
}
