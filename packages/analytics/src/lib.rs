#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ward-level aggregation and per-capita rate computation.
//!
//! Groups cleaned incidents by ward, inner-joins the counts with census
//! population, and computes fires per 1,000 residents. Wards missing from
//! either side of the join are excluded from the rate table; the exclusions
//! are reported in [`RateJoinSummary`] rather than dropped silently.

use std::collections::{BTreeMap, BTreeSet};

use fire_map_fire_models::{FireIncident, WardKey};
use fire_map_population::WardPopulation;
use serde::{Deserialize, Serialize};

/// Incident count for a single ward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardAggregate {
    /// Normalized ward key.
    pub ward: WardKey,
    /// Number of cleaned incidents in this ward.
    pub count: u64,
}

/// Joined count, population, and per-capita rate for a single ward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardRate {
    /// Normalized ward key.
    pub ward: WardKey,
    /// Number of cleaned incidents in this ward.
    pub count: u64,
    /// 2021 census population.
    pub population: f64,
    /// Incidents per 1,000 residents.
    pub per_1000: f64,
}

/// Wards excluded from the rate table and why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateJoinSummary {
    /// Wards with incidents but no population row.
    pub missing_population: Vec<WardKey>,
    /// Wards with a population row but no incidents.
    pub missing_counts: Vec<WardKey>,
    /// Wards skipped because their population was zero or negative; a
    /// division there would propagate a non-finite rate into the map.
    pub zero_population: Vec<WardKey>,
}

/// Set differences between boundary polygons and aggregated counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardCoverage {
    /// Wards with a boundary polygon but no incident counts.
    pub only_in_boundaries: Vec<WardKey>,
    /// Wards with counts but no matching polygon (would be invisible on
    /// the choropleth).
    pub only_in_counts: Vec<WardKey>,
}

/// Groups cleaned incidents by ward and counts them.
///
/// Output is ordered by ward key and contains one row per ward actually
/// present; wards with zero incidents are absent, not zero. The sum of all
/// counts equals the number of cleaned incidents.
#[must_use]
pub fn count_by_ward(incidents: &[FireIncident]) -> Vec<WardAggregate> {
    let mut counts: BTreeMap<WardKey, u64> = BTreeMap::new();

    for incident in incidents {
        *counts.entry(incident.ward).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(ward, count)| WardAggregate { ward, count })
        .collect()
}

/// Inner-joins ward counts with population and computes per-1,000 rates.
///
/// Only wards present in both tables produce a rate row. Wards whose
/// population is not positive are excluded as well and reported in the
/// summary instead of propagating an infinite or NaN rate.
#[must_use]
pub fn join_rates(
    aggregates: &[WardAggregate],
    populations: &[WardPopulation],
) -> (Vec<WardRate>, RateJoinSummary) {
    let population_by_ward: BTreeMap<WardKey, f64> =
        populations.iter().map(|p| (p.ward, p.population)).collect();
    let counted_wards: BTreeSet<WardKey> = aggregates.iter().map(|a| a.ward).collect();

    let mut rates = Vec::with_capacity(aggregates.len());
    let mut summary = RateJoinSummary::default();

    for aggregate in aggregates {
        match population_by_ward.get(&aggregate.ward) {
            Some(&population) if population > 0.0 => {
                #[allow(clippy::cast_precision_loss)]
                let per_1000 = aggregate.count as f64 / population * 1000.0;
                rates.push(WardRate {
                    ward: aggregate.ward,
                    count: aggregate.count,
                    population,
                    per_1000,
                });
            }
            Some(_) => summary.zero_population.push(aggregate.ward),
            None => summary.missing_population.push(aggregate.ward),
        }
    }

    summary.missing_counts = populations
        .iter()
        .map(|p| p.ward)
        .filter(|ward| !counted_wards.contains(ward))
        .collect();

    if !summary.missing_population.is_empty()
        || !summary.missing_counts.is_empty()
        || !summary.zero_population.is_empty()
    {
        log::info!(
            "Rate join exclusions: {} wards without population, {} wards without counts, {} wards with non-positive population",
            summary.missing_population.len(),
            summary.missing_counts.len(),
            summary.zero_population.len(),
        );
    }

    (rates, summary)
}

/// Computes the set differences between boundary ward keys and aggregated
/// counts.
///
/// A ward on only one side of this comparison renders as a hole in the
/// choropleth; typing the differences lets the server log and expose them.
#[must_use]
pub fn ward_coverage(boundary_wards: &[WardKey], aggregates: &[WardAggregate]) -> WardCoverage {
    let boundaries: BTreeSet<WardKey> = boundary_wards.iter().copied().collect();
    let counted: BTreeSet<WardKey> = aggregates.iter().map(|a| a.ward).collect();

    WardCoverage {
        only_in_boundaries: boundaries.difference(&counted).copied().collect(),
        only_in_counts: counted.difference(&boundaries).copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(ward: i64) -> FireIncident {
        FireIncident {
            latitude: 43.7,
            longitude: -79.4,
            ward: WardKey::new(ward).unwrap(),
            incident_type: None,
            alarm_time: None,
            alarm_time_raw: None,
        }
    }

    fn population(ward: i64, population: f64) -> WardPopulation {
        WardPopulation { ward: WardKey::new(ward).unwrap(), population }
    }

    #[test]
    fn counts_by_ward_in_key_order() {
        let incidents = vec![incident(13), incident(7), incident(13), incident(13)];
        let aggregates = count_by_ward(&incidents);
        assert_eq!(aggregates.len(), 2);
        assert_eq!(aggregates[0].ward.to_string(), "07");
        assert_eq!(aggregates[0].count, 1);
        assert_eq!(aggregates[1].ward.to_string(), "13");
        assert_eq!(aggregates[1].count, 3);
    }

    #[test]
    fn aggregation_is_count_preserving() {
        let incidents: Vec<FireIncident> =
            (1..=25).flat_map(|w| std::iter::repeat_n(incident(w), w as usize)).collect();
        let aggregates = count_by_ward(&incidents);
        let total: u64 = aggregates.iter().map(|a| a.count).sum();
        assert_eq!(total, incidents.len() as u64);
    }

    #[test]
    fn absent_wards_produce_no_aggregate_row() {
        let aggregates = count_by_ward(&[incident(7)]);
        assert_eq!(aggregates.len(), 1);
        assert!(aggregates.iter().all(|a| a.ward.to_string() != "08"));
    }

    #[test]
    fn computes_per_1000_rate() {
        let aggregates = vec![WardAggregate { ward: WardKey::new(13).unwrap(), count: 2217 }];
        let populations = vec![population(13, 103_000.0)];
        let (rates, summary) = join_rates(&aggregates, &populations);
        assert_eq!(rates.len(), 1);
        assert!((rates[0].per_1000 - 21.524_271_844_660_194).abs() < 1e-9);
        assert_eq!(summary, RateJoinSummary::default());
    }

    #[test]
    fn join_is_strictly_inner() {
        let aggregates = vec![
            WardAggregate { ward: WardKey::new(7).unwrap(), count: 10 },
            WardAggregate { ward: WardKey::new(13).unwrap(), count: 20 },
        ];
        let populations = vec![population(13, 100_000.0), population(14, 90_000.0)];

        let (rates, summary) = join_rates(&aggregates, &populations);

        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].ward.to_string(), "13");
        assert_eq!(summary.missing_population, vec![WardKey::new(7).unwrap()]);
        assert_eq!(summary.missing_counts, vec![WardKey::new(14).unwrap()]);
    }

    #[test]
    fn zero_population_excluded_not_infinite() {
        let aggregates = vec![WardAggregate { ward: WardKey::new(5).unwrap(), count: 3 }];
        let populations = vec![population(5, 0.0)];

        let (rates, summary) = join_rates(&aggregates, &populations);

        assert!(rates.is_empty());
        assert_eq!(summary.zero_population, vec![WardKey::new(5).unwrap()]);
    }

    #[test]
    fn coverage_reports_set_differences() {
        let boundary_wards: Vec<WardKey> = [7, 8, 13].iter().map(|&w| WardKey::new(w).unwrap()).collect();
        let aggregates = vec![
            WardAggregate { ward: WardKey::new(7).unwrap(), count: 1 },
            WardAggregate { ward: WardKey::new(21).unwrap(), count: 2 },
        ];

        let coverage = ward_coverage(&boundary_wards, &aggregates);

        assert_eq!(coverage.only_in_boundaries, vec![WardKey::new(8).unwrap(), WardKey::new(13).unwrap()]);
        assert_eq!(coverage.only_in_counts, vec![WardKey::new(21).unwrap()]);
    }
}
