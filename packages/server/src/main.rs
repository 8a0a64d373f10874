#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Entry point for the fire map dashboard server.
//!
//! Loads all three upstream datasets and builds the figures before binding
//! the listener, so a data problem fails the process instead of serving a
//! broken dashboard.

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use clap::Parser;
use fire_map_server::config::Config;
use fire_map_server::pipeline::load_dashboard;
use fire_map_server::{AppState, handlers};

/// Toronto fire incident dashboard server.
#[derive(Parser)]
#[command(name = "fire_map_server", about = "Toronto fire incident dashboard")]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(long)]
    debug: bool,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let mut builder = pretty_env_logger::formatted_builder();
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else if cli.debug {
        builder.parse_filters("debug");
    } else {
        builder.parse_filters("info");
    }
    builder.init();

    let config = Config::from_env();

    let client = fire_map_source::build_client().expect("Failed to build HTTP client");

    log::info!("Loading dashboard data...");
    let data = load_dashboard(&client, &config)
        .await
        .expect("Failed to load dashboard data");

    let state = web::Data::new(AppState { data });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    let bind = (config.bind_addr.clone(), config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/views", web::get().to(handlers::views))
                    .route("/figure/{view}", web::get().to(handlers::figure))
                    .route("/summary", web::get().to(handlers::summary)),
            )
            // Serve the static dashboard frontend
            .service(
                Files::new("/", concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
                    .index_file("index.html"),
            )
    })
    .bind(bind)?
    .run()
    .await
}
