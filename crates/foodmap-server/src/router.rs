//! Axum router construction for the Food Map API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled so a browser map page served from elsewhere can call it.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::catalog;
use crate::handlers;
use crate::state::AppState;
use crate::transfer;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /api/health` -- liveness and counts
/// - `GET /api/places` -- filtered place list
/// - `GET /api/places/{id}` -- single place
/// - `GET|POST /api/places/{id}/experiences` -- read or log experiences
/// - `GET /api/places/{id}/reminders` -- disliked or annotated records
/// - `GET /api/insights` -- liked foods across places
/// - `GET /api/regions` -- zoom regions
/// - `GET /api/catalog` -- catalog status
/// - `POST /api/catalog/reload` -- city search or seed reload
/// - `GET /api/export` / `POST /api/import` -- JSON transfer
///
/// Place ids such as `node/123` must be percent-encoded in paths.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        .route("/api/health", get(handlers::health))
        // Places
        .route("/api/places", get(handlers::list_places))
        .route("/api/places/{id}", get(handlers::get_place))
        .route(
            "/api/places/{id}/experiences",
            get(handlers::list_experiences).post(handlers::append_experience),
        )
        .route("/api/places/{id}/reminders", get(handlers::list_reminders))
        .route("/api/insights", get(handlers::insights))
        .route("/api/regions", get(handlers::list_regions))
        // Catalog loads
        .route("/api/catalog", get(catalog::catalog_status))
        .route("/api/catalog/reload", post(catalog::reload_catalog))
        // Export / import
        .route("/api/export", get(transfer::export_experiences))
        .route("/api/import", post(transfer::import_experiences))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
