//! Integration tests for the live catalog source.
//!
//! A small Axum app on a loopback port stands in for both the geocoder and
//! the Overpass interpreter, so the full HTTP path (query encoding, status
//! handling, response parsing, POI normalization) runs without the public
//! services.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::Router;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use foodmap_catalog::CatalogSource;
use foodmap_geo::{GeoConfig, GeoError, LiveCatalogSource};
use serde_json::json;

async fn search(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    match params.get("q").map(String::as_str) {
        Some("Manila") => axum::Json(json!([{
            "display_name": "Manila",
            "boundingbox": ["14.5", "14.6", "120.9", "121.0"]
        }]))
        .into_response(),
        Some("Broken") => (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response(),
        _ => axum::Json(json!([])).into_response(),
    }
}

async fn interpreter(body: String) -> impl IntoResponse {
    if !body.starts_with("data=") {
        return (StatusCode::BAD_REQUEST, "missing data").into_response();
    }
    axum::Json(json!({
        "elements": [
            { "type": "node", "id": 10, "lat": 14.55, "lon": 120.98,
              "tags": { "amenity": "cafe", "name": "Kape Kalye", "cuisine": "coffee_shop" } },
            { "type": "way", "id": 20, "center": { "lat": 14.57, "lon": 120.99 },
              "tags": { "amenity": "restaurant" } },
            { "type": "node", "id": 10, "lat": 14.55, "lon": 120.98,
              "tags": { "amenity": "cafe", "name": "Kape Kalye" } }
        ]
    }))
    .into_response()
}

async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/search", get(search))
        .route("/api/interpreter", post(interpreter));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn source_for(addr: SocketAddr) -> LiveCatalogSource {
    let config = GeoConfig {
        nominatim_url: format!("http://{addr}"),
        overpass_url: format!("http://{addr}/api/interpreter"),
        timeout_secs: 5,
        ..GeoConfig::default()
    };
    LiveCatalogSource::new(&config).unwrap()
}

#[tokio::test]
async fn fetch_builds_catalog_from_upstream() {
    let addr = spawn_upstream().await;
    let source = source_for(addr);

    let catalog = source.fetch("  Manila ").await.unwrap();

    assert_eq!(
        catalog.source(),
        &CatalogSource::Live {
            city: String::from("Manila")
        }
    );
    let ids: Vec<String> = catalog.ids().into_iter().map(|id| id.into_inner()).collect();
    assert_eq!(ids, vec![String::from("node/10"), String::from("way/20")]);

    let cafe = catalog.places().first().unwrap();
    assert_eq!(cafe.name, "Kape Kalye");
    assert_eq!(cafe.foods, vec![String::from("Coffee shop")]);

    let way = catalog.places().get(1).unwrap();
    assert_eq!(way.name, foodmap_catalog::UNNAMED_PLACE);
}

#[tokio::test]
async fn unknown_city_is_place_not_found() {
    let addr = spawn_upstream().await;
    let source = source_for(addr);

    let result = source.fetch("Atlantis").await;
    assert!(matches!(result, Err(GeoError::PlaceNotFound(city)) if city == "Atlantis"));
}

#[tokio::test]
async fn upstream_error_status_is_reported() {
    let addr = spawn_upstream().await;
    let source = source_for(addr);

    let result = source.fetch("Broken").await;
    assert!(matches!(
        result,
        Err(GeoError::Status {
            service: "geocoder",
            status: 503,
            ..
        })
    ));
}
