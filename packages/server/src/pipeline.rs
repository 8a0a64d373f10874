//! Startup pipeline: fetch, clean, aggregate, join, build figures.
//!
//! Runs once, sequentially, before the HTTP listener binds. Any failure is
//! fatal: the dashboard cannot render without all three upstream datasets,
//! so there is no partial-rendering fallback.

use fire_map_analytics::{RateJoinSummary, WardAggregate, WardRate, count_by_ward, join_rates, ward_coverage};
use fire_map_figures::{Figures, build_figures};
use fire_map_fire_models::FireIncident;
use fire_map_geography::{WardBoundaries, extract_feature_collection, ward_boundaries};
use fire_map_ingest::clean_incidents;
use fire_map_population::extract_ward_population;
use fire_map_server_models::ApiSummary;
use fire_map_source::{download_csv, fetch_bytes, fetch_text};

use crate::config::Config;

/// Errors that abort startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// Fetching or parsing a remote dataset failed.
    #[error("Source error: {0}")]
    Source(#[from] fire_map_source::SourceError),

    /// The ward boundary payload could not be parsed.
    #[error("Boundary error: {0}")]
    Geo(#[from] fire_map_geography::GeoError),

    /// The census workbook layout did not match expectations.
    #[error("Population error: {0}")]
    Population(#[from] fire_map_population::PopulationError),
}

/// The immutable pipeline output bundle.
///
/// Built once at startup and passed explicitly into the handlers; there is
/// no module-level state and no update path.
#[derive(Debug, Clone)]
pub struct DashboardData {
    /// Ward boundary polygons.
    pub boundaries: WardBoundaries,
    /// Cleaned incident rows.
    pub incidents: Vec<FireIncident>,
    /// Per-ward incident counts.
    pub aggregates: Vec<WardAggregate>,
    /// Per-ward rate rows (strict inner join of counts and population).
    pub rates: Vec<WardRate>,
    /// The three precomputed figures.
    pub figures: Figures,
    /// Data-quality summary for `/api/summary`.
    pub summary: ApiSummary,
}

/// Fetches the three upstream datasets and runs the full transform chain.
///
/// Fetches are sequential with a fixed per-request timeout and no retries.
///
/// # Errors
///
/// Returns [`StartupError`] if any fetch fails, the boundary payload is
/// not parseable `GeoJSON`, or the workbook layout has drifted.
pub async fn load_dashboard(
    client: &reqwest::Client,
    config: &Config,
) -> Result<DashboardData, StartupError> {
    log::info!("Fetching fire incidents from {}", config.fire_url);
    let raw_incidents = download_csv(client, &config.fire_url).await?;
    let (incidents, cleaning) = clean_incidents(&raw_incidents);

    log::info!("Fetching ward boundaries from {}", config.wards_url);
    let boundary_text = fetch_text(client, &config.wards_url).await?;
    let boundaries = ward_boundaries(extract_feature_collection(&boundary_text)?)?;

    log::info!("Fetching ward populations from {}", config.population_url);
    let workbook_bytes = fetch_bytes(client, &config.population_url).await?;
    let populations = extract_ward_population(&workbook_bytes)?;

    let aggregates = count_by_ward(&incidents);
    let (rates, rate_join) = join_rates(&aggregates, &populations);

    let coverage = ward_coverage(&boundaries.wards, &aggregates);
    log_coverage(&coverage, &rate_join);

    let figures = build_figures(&boundaries, &incidents, &rates);

    let summary = ApiSummary {
        cleaning,
        wards_with_incidents: aggregates.len() as u64,
        wards_with_rates: rates.len() as u64,
        rate_join,
        coverage,
    };

    Ok(DashboardData { boundaries, incidents, aggregates, rates, figures, summary })
}

/// Logs the ward coverage and join diagnostics so excluded wards are
/// visible in the startup output.
fn log_coverage(coverage: &fire_map_analytics::WardCoverage, rate_join: &RateJoinSummary) {
    if coverage.only_in_boundaries.is_empty() && coverage.only_in_counts.is_empty() {
        log::info!("Ward coverage: every boundary polygon has incident counts");
    } else {
        log::info!(
            "Ward coverage: only in boundaries: {:?}, only in counts: {:?}",
            coverage.only_in_boundaries.iter().map(ToString::to_string).collect::<Vec<_>>(),
            coverage.only_in_counts.iter().map(ToString::to_string).collect::<Vec<_>>(),
        );
    }

    if !rate_join.zero_population.is_empty() {
        log::warn!(
            "Wards excluded from the rate view for non-positive population: {:?}",
            rate_join.zero_population.iter().map(ToString::to_string).collect::<Vec<_>>(),
        );
    }
}
