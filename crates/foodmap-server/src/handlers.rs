//! REST API endpoint handlers for places and experiences.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/health` | Liveness and counts |
//! | `GET` | `/api/places` | List places, filtered |
//! | `GET` | `/api/places/{id}` | Single place |
//! | `GET` | `/api/places/{id}/experiences` | Records for a place |
//! | `POST` | `/api/places/{id}/experiences` | Log an experience |
//! | `GET` | `/api/places/{id}/reminders` | Disliked or annotated records |
//! | `GET` | `/api/insights` | Liked foods across the filtered places |
//! | `GET` | `/api/regions` | Regions the map can zoom to |
//!
//! Experience routes accept any place id, including ids that are not in
//! the current catalog: records outlive the catalog they were logged
//! against.

use std::collections::BTreeMap;
use std::sync::Arc;

use askama::Template;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use foodmap_catalog::{DEFAULT_RADIUS_M, PlaceFilter, Proximity};
use foodmap_types::{Category, ExperienceDraft, PlaceId};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

/// Query parameters shared by `GET /api/places` and `GET /api/insights`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct PlacesQuery {
    /// Case-insensitive name substring.
    pub q: Option<String>,
    /// Category wire name (`restaurant`, `cafe`, `fast_food`, `unspecified`).
    pub category: Option<String>,
    /// Region name.
    pub region: Option<String>,
    /// Latitude for a proximity search. Requires `lng`.
    pub lat: Option<f64>,
    /// Longitude for a proximity search. Requires `lat`.
    pub lng: Option<f64>,
    /// Radius in meters (default 10 km).
    pub radius_m: Option<f64>,
}

impl PlacesQuery {
    /// Turn the raw parameters into a catalog filter.
    pub fn to_filter(&self) -> Result<PlaceFilter, ApiError> {
        let mut filter = PlaceFilter::default();

        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            filter = filter.with_query(q);
        }
        if let Some(raw) = self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            let category: Category = raw
                .parse()
                .map_err(|e| ApiError::InvalidRequest(format!("category: {e}")))?;
            filter = filter.with_category(category);
        }
        if let Some(region) = self.region.as_deref().filter(|r| !r.trim().is_empty()) {
            filter = filter.with_region(region.trim());
        }

        match (self.lat, self.lng) {
            (Some(latitude), Some(longitude)) => {
                let radius_m = self.radius_m.unwrap_or(DEFAULT_RADIUS_M);
                if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
                    return Err(ApiError::InvalidRequest(String::from(
                        "lat must be within [-90, 90] and lng within [-180, 180]",
                    )));
                }
                if !radius_m.is_finite() || radius_m < 0.0 {
                    return Err(ApiError::InvalidRequest(String::from(
                        "radius_m must be a non-negative number",
                    )));
                }
                filter = filter.near(Proximity {
                    latitude,
                    longitude,
                    radius_m,
                });
            }
            (None, None) => {}
            _ => {
                return Err(ApiError::InvalidRequest(String::from(
                    "lat and lng must be given together",
                )));
            }
        }
        Ok(filter)
    }
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// The status page template. Interpolated values are HTML-escaped.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    place_count: usize,
    visited: usize,
    records: usize,
    source: String,
    live: &'static str,
}

/// Serve a minimal HTML page showing server status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let (place_count, source) = {
        let catalog = state.catalog.read().await;
        let current = catalog.loader.current();
        let source = match current.source() {
            foodmap_catalog::CatalogSource::Seed => String::from("seed list"),
            foodmap_catalog::CatalogSource::Live { city } => format!("live: {city}"),
        };
        (current.len(), source)
    };
    let (visited, records) = {
        let store = state.store.lock().await;
        (store.place_ids().count(), store.total_records())
    };
    let live = if state.live.is_some() { "enabled" } else { "disabled" };

    let page = IndexPage {
        place_count,
        visited,
        records,
        source,
        live,
    };
    Ok(Html(page.render()?))
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Liveness check with basic counts.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let places = state.catalog.read().await.loader.current().len();
    let records = state.store.lock().await.total_records();
    Json(serde_json::json!({
        "status": "ok",
        "places": places,
        "records": records,
    }))
}

// ---------------------------------------------------------------------------
// GET /api/places -- list places
// ---------------------------------------------------------------------------

/// List catalog places matching the query, with their bounding box.
///
/// A proximity search that finds nothing falls back to the same query
/// without the distance criterion; `fallback` is then `true` and
/// `nearby_count` is `0`. Without `lat`/`lng`, `nearby_count` is `null`.
pub async fn list_places(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlacesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.to_filter()?;
    let catalog = state.catalog.read().await;
    let current = catalog.loader.current();

    let mut places = current.filter(&filter);
    let nearby_count = filter.near.map(|_| places.len());
    let fallback = nearby_count == Some(0);
    if fallback {
        let widened = PlaceFilter {
            near: None,
            ..filter
        };
        places = current.filter(&widened);
    }
    let bounds = foodmap_catalog::filter::bounds(places.iter().copied());

    Ok(Json(serde_json::json!({
        "source": current.source(),
        "generation": catalog.loader.installed_generation(),
        "count": places.len(),
        "nearby_count": nearby_count,
        "fallback": fallback,
        "bounds": bounds,
        "places": places,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/places/{id} -- single place
// ---------------------------------------------------------------------------

/// Return one place from the current catalog.
pub async fn get_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = PlaceId::new(id);
    let catalog = state.catalog.read().await;
    let place = catalog
        .loader
        .current()
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("place {id}")))?;
    Ok(Json(serde_json::to_value(place)?))
}

// ---------------------------------------------------------------------------
// Experiences
// ---------------------------------------------------------------------------

/// All experiences logged at a place, oldest first.
///
/// `in_catalog` tells whether the place is in the catalog currently loaded.
pub async fn list_experiences(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = PlaceId::new(id);
    let in_catalog = state.catalog.read().await.loader.current().contains(&id);
    let store = state.store.lock().await;
    let records = store.records_for(&id);
    Ok(Json(serde_json::json!({
        "place_id": id,
        "in_catalog": in_catalog,
        "count": records.len(),
        "experiences": records,
    })))
}

/// Log an experience at a place.
///
/// Responds `201 Created` with the stored record. A failed write-through
/// still succeeds, with `"persisted": false`.
pub async fn append_experience(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<ExperienceDraft>,
) -> Result<impl IntoResponse, ApiError> {
    let id = PlaceId::new(id);
    let store = Arc::clone(&state.store);
    let place_id = id.clone();
    let receipt = tokio::task::spawn_blocking(move || store.blocking_lock().append(&place_id, draft))
        .await
        .map_err(|e| ApiError::Task(format!("join: {e}")))??;
    let persisted = receipt.persistence.is_persisted();
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "place_id": id,
            "experience": receipt.record,
            "persisted": persisted,
        })),
    ))
}

/// Records worth resurfacing on a revisit.
pub async fn list_reminders(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = PlaceId::new(id);
    let store = state.store.lock().await;
    let reminders = store.reminders(&id);
    Ok(Json(serde_json::json!({
        "place_id": id,
        "count": reminders.len(),
        "reminders": reminders,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/insights -- liked foods
// ---------------------------------------------------------------------------

/// Liked foods across the places matching the query, in catalog order,
/// each with the place name for a "food at place" line.
pub async fn insights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlacesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = params.to_filter()?;
    let (ids, names): (Vec<PlaceId>, BTreeMap<PlaceId, String>) = {
        let catalog = state.catalog.read().await;
        let places = catalog.loader.current().filter(&filter);
        (
            places.iter().map(|p| p.id.clone()).collect(),
            places.iter().map(|p| (p.id.clone(), p.name.clone())).collect(),
        )
    };

    let liked = state.store.lock().await.liked_food_summaries(&ids);
    let items: Vec<serde_json::Value> = liked
        .into_iter()
        .map(|l| {
            let place_name = names.get(&l.place_id).cloned().unwrap_or_default();
            serde_json::json!({
                "food": l.food,
                "place_id": l.place_id,
                "place_name": place_name,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "count": items.len(),
        "liked": items,
    })))
}

// ---------------------------------------------------------------------------
// GET /api/regions
// ---------------------------------------------------------------------------

/// Regions the map can zoom to.
pub async fn list_regions(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "count": state.regions.len(),
        "regions": state.regions,
    }))
}
