//! Export and import of the experience log as JSON text.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// File name suggested to browsers for exports.
pub const EXPORT_FILE_NAME: &str = "experiences.json";

/// `GET /api/export` -- the whole store as downloadable JSON.
pub async fn export_experiences(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let text = state.store.lock().await.export_text()?;
    Ok((
        [
            (header::CONTENT_TYPE, String::from("application/json")),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        text,
    ))
}

/// `POST /api/import` -- merge exported text into the store.
///
/// The body is the raw export text. Records are appended after any
/// existing history for the same place; nothing is deduplicated. A body
/// that does not decode changes nothing and answers `400`.
pub async fn import_experiences(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let store = Arc::clone(&state.store);
    let report = tokio::task::spawn_blocking(move || store.blocking_lock().import_text(&body))
        .await
        .map_err(|e| ApiError::Task(format!("join: {e}")))??;
    tracing::info!(added = report.added, places = report.places, "Experiences imported");
    Ok(Json(serde_json::json!({
        "added": report.added,
        "places": report.places,
        "persisted": report.persistence.is_persisted(),
    })))
}
