//! City name to bounding box lookup against a Nominatim-compatible API.
//!
//! Only the first match is used. An empty result list means the name is
//! unknown, which is reported as `Ok(None)` rather than an error.

use foodmap_types::BoundingBox;
use serde_json::Value;

use crate::error::GeoError;

const SERVICE: &str = "geocoder";

/// Client for the `/search` endpoint.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    /// Create a geocoder sharing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Look up `city` and return its bounding box, if any.
    pub async fn lookup(&self, city: &str) -> Result<Option<BoundingBox>, GeoError> {
        let url = format!("{}/search", self.base_url);
        tracing::debug!(city, url = %url, "Geocoding");

        let response = self
            .client
            .get(&url)
            .query(&[("format", "json"), ("limit", "1"), ("q", city)])
            .send()
            .await
            .map_err(|e| GeoError::Http {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(GeoError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response.json().await.map_err(|e| GeoError::Decode {
            service: SERVICE,
            message: e.to_string(),
        })?;

        parse_search_response(&json)
    }
}

/// Extract the first result's bounding box from a search response.
///
/// Nominatim encodes the box as four strings in the order
/// `[south, north, west, east]`.
pub fn parse_search_response(json: &Value) -> Result<Option<BoundingBox>, GeoError> {
    let results = json.as_array().ok_or_else(|| decode_error("expected a JSON array"))?;
    let Some(first) = results.first() else {
        return Ok(None);
    };

    let raw = first
        .get("boundingbox")
        .and_then(Value::as_array)
        .ok_or_else(|| decode_error("result has no boundingbox"))?;

    let edges = raw
        .iter()
        .map(coordinate)
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| decode_error("boundingbox entries must be numbers"))?;

    match edges.as_slice() {
        &[south, north, west, east] => Ok(Some(BoundingBox {
            south,
            north,
            west,
            east,
        })),
        other => Err(decode_error(&format!(
            "boundingbox must have 4 entries, found {}",
            other.len()
        ))),
    }
}

/// Nominatim sends numbers as strings; accept either.
fn coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn decode_error(message: &str) -> GeoError {
    GeoError::Decode {
        service: SERVICE,
        message: message.to_owned(),
    }
}
