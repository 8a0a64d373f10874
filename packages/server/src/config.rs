//! Server configuration from environment variables.
//!
//! Every setting has a hard-coded default: the three upstream dataset URLs
//! point at the published Toronto open data mirrors, and the server binds
//! to localhost. Overrides come from the environment only; the CLI's sole
//! flag is `--debug` (logging).

/// Default URL of the fire incident CSV.
const DEFAULT_FIRE_URL: &str = "https://raw.githubusercontent.com/jragh/plotlymeetup/refs/heads/main/June_2025/Fire%20Incidents%20Data%20Raw.csv";

/// Default URL of the ward boundary `GeoJSON`.
const DEFAULT_WARDS_URL: &str = "https://raw.githubusercontent.com/Andrew-Girgis/toronto-fire-incidents-plotly/main/tor_city_wards25.geojson";

/// Default URL of the ward profiles census workbook.
const DEFAULT_POPULATION_URL: &str = "https://raw.githubusercontent.com/Andrew-Girgis/toronto-fire-incidents-plotly/main/2023-WardProfiles-2011-2021-CensusData.xlsx";

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the fire incident CSV.
    pub fire_url: String,
    /// URL of the ward boundary `GeoJSON`.
    pub wards_url: String,
    /// URL of the ward profiles census workbook.
    pub population_url: String,
    /// Address to bind the HTTP listener to.
    pub bind_addr: String,
    /// Port to bind the HTTP listener to.
    pub port: u16,
}

impl Config {
    /// Reads configuration from the environment, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            fire_url: env_or("FIRE_MAP_FIRE_URL", DEFAULT_FIRE_URL),
            wards_url: env_or("FIRE_MAP_WARDS_URL", DEFAULT_WARDS_URL),
            population_url: env_or("FIRE_MAP_POPULATION_URL", DEFAULT_POPULATION_URL),
            bind_addr: env_or("BIND_ADDR", "127.0.0.1"),
            port: std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080),
        }
    }
}

/// Reads an environment variable with a default.
fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}
