//! HTTP handler functions for the fire map API.

use actix_web::{HttpResponse, web};
use fire_map_figures::ViewKind;
use fire_map_server_models::{ApiHealth, ApiView};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/views`
///
/// Returns the three selectable views in tab order.
pub async fn views() -> HttpResponse {
    let views: Vec<ApiView> = ViewKind::ALL
        .iter()
        .map(|view| ApiView { value: view.to_string(), title: view.title().to_owned() })
        .collect();

    HttpResponse::Ok().json(views)
}

/// `GET /api/figure/{view}`
///
/// Returns the precomputed figure for a view label. The frontend only
/// emits the three valid labels; anything else is answered with a 404.
pub async fn figure(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let label = path.into_inner();

    match label.parse::<ViewKind>() {
        Ok(view) => HttpResponse::Ok().json(state.data.figures.select(view)),
        Err(_) => {
            log::debug!("Unknown view label requested: {label}");
            HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("unknown view '{label}'")
            }))
        }
    }
}

/// `GET /api/summary`
///
/// Returns the data-quality summary from the startup pipeline run: rows
/// dropped during cleaning and wards excluded from the rate join.
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.data.summary)
}
