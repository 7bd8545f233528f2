//! Catalog status and reload endpoints.
//!
//! A reload takes a ticket from the loader, fetches without holding any
//! lock, then hands the result back to the loader, which installs it only
//! if no newer reload was started in the meantime.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use foodmap_catalog::{CatalogError, LoadResolution, PlaceCatalog, seed_catalog};

use crate::error::ApiError;
use crate::state::{AppState, CatalogState};

/// Body of `POST /api/catalog/reload`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ReloadRequest {
    /// City to search for.
    pub city: Option<String>,
    /// Restore the built-in seed list instead of searching.
    #[serde(default)]
    pub seed: bool,
}

/// What a reload asked for, once validated.
enum ReloadTarget {
    Seed,
    City(String),
}

impl ReloadRequest {
    fn target(self) -> Result<ReloadTarget, ApiError> {
        let city = self.city.map(|c| c.trim().to_owned()).filter(|c| !c.is_empty());
        match (self.seed, city) {
            (true, None) => Ok(ReloadTarget::Seed),
            (false, Some(city)) => Ok(ReloadTarget::City(city)),
            (true, Some(_)) => Err(ApiError::InvalidRequest(String::from(
                "give either city or seed, not both",
            ))),
            (false, None) => Err(ApiError::InvalidRequest(String::from(
                "city must not be empty",
            ))),
        }
    }
}

/// `GET /api/catalog` -- what is loaded and how the last loads went.
pub async fn catalog_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = state.catalog.read().await;
    let CatalogState { loader, status } = &*catalog;
    Json(serde_json::json!({
        "source": loader.current().source(),
        "generation": loader.installed_generation(),
        "place_count": loader.current().len(),
        "bounds": loader.current().bounds(),
        "replacements": status.replacements,
        "last_error": status.last_error,
        "live_enabled": state.live.is_some(),
    }))
}

/// `POST /api/catalog/reload` -- replace the catalog with a city search or
/// the seed list.
///
/// Responds with the applied catalog summary, `409` if a newer reload
/// superseded this one, or `502` if the fetch failed (the previous catalog
/// stays in effect).
pub async fn reload_catalog(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReloadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let target = request.target()?;
    if matches!(target, ReloadTarget::City(_)) && state.live.is_none() {
        return Err(ApiError::LiveDisabled);
    }

    let ticket = state.catalog.write().await.loader.begin();
    let result = fetch(&state, target).await;

    let mut catalog = state.catalog.write().await;
    let CatalogState { loader, status } = &mut *catalog;
    match loader.complete(ticket, result, status) {
        LoadResolution::Applied {
            generation,
            place_count,
        } => Ok(Json(serde_json::json!({
            "generation": generation,
            "place_count": place_count,
            "source": loader.current().source(),
            "bounds": loader.current().bounds(),
        }))),
        LoadResolution::Failed { error, .. } => Err(ApiError::CatalogLoad(error)),
        LoadResolution::Stale { generation, latest } => {
            Err(ApiError::Superseded { generation, latest })
        }
    }
}

async fn fetch(state: &AppState, target: ReloadTarget) -> Result<PlaceCatalog, CatalogError> {
    match target {
        ReloadTarget::Seed => seed_catalog(),
        ReloadTarget::City(city) => match &state.live {
            Some(live) => live.fetch(&city).await.map_err(CatalogError::from),
            None => Err(CatalogError::Source(String::from("live city search is disabled"))),
        },
    }
}
