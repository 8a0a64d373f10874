#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web dashboard server for the fire map.
//!
//! Runs the extract-transform pipeline once at startup, holds the results
//! immutably for the process lifetime, and serves the three precomputed
//! figures plus a data-quality summary to the static dashboard frontend.

pub mod config;
pub mod handlers;
pub mod pipeline;

use crate::pipeline::DashboardData;

/// Shared application state.
///
/// Everything in here is computed once before the listener binds and never
/// mutated afterwards; handlers only read.
pub struct AppState {
    /// The immutable pipeline output bundle.
    pub data: DashboardData,
}
