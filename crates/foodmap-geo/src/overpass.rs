//! POI queries against an Overpass API interpreter.
//!
//! The query selects nodes and ways whose `amenity` tag is one of the
//! requested categories inside a bounding box, asking for computed centers
//! so ways come back locatable.

use std::fmt::Write as _;

use foodmap_types::{BoundingBox, Category, RawPoi};
use serde_json::Value;

use crate::error::GeoError;

const SERVICE: &str = "overpass";

/// Server-side query timeout, in seconds, embedded in the QL header.
const QUERY_TIMEOUT_SECS: u32 = 25;

/// Client for an Overpass interpreter endpoint.
#[derive(Debug, Clone)]
pub struct PoiClient {
    client: reqwest::Client,
    url: String,
}

impl PoiClient {
    /// Create a POI client sharing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
        }
    }

    /// Fetch raw POIs of the given categories inside `bbox`.
    pub async fn query(
        &self,
        bbox: &BoundingBox,
        categories: &[Category],
    ) -> Result<Vec<RawPoi>, GeoError> {
        let ql = build_query(bbox, categories);
        tracing::debug!(url = %self.url, query = %ql, "Querying POIs");

        let response = self
            .client
            .post(&self.url)
            .form(&[("data", ql.as_str())])
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

        parse_elements(&json)
    }
}

/// Build the Overpass QL query for `categories` inside `bbox`.
///
/// `Unspecified` is never queried. An empty category list asks for every
/// queryable category.
pub fn build_query(bbox: &BoundingBox, categories: &[Category]) -> String {
    let wanted: Vec<&str> = categories
        .iter()
        .filter(|c| Category::QUERYABLE.contains(c))
        .map(|c| c.as_str())
        .collect();
    let amenities = if wanted.is_empty() {
        Category::QUERYABLE.map(Category::as_str).join("|")
    } else {
        wanted.join("|")
    };

    // Overpass boxes are (south, west, north, east).
    let area = format!("({},{},{},{})", bbox.south, bbox.west, bbox.north, bbox.east);

    let mut ql = format!("[out:json][timeout:{QUERY_TIMEOUT_SECS}];\n(\n");
    for element in ["node", "way"] {
        let _ = writeln!(ql, "  {element}[\"amenity\"~\"^({amenities})$\"]{area};");
    }
    ql.push_str(");\nout center;\n");
    ql
}

/// Extract POI entries from an Overpass JSON response.
///
/// Elements that do not look like a POI (unknown type, missing id) are
/// skipped; a response without an `elements` array is an error.
pub fn parse_elements(json: &Value) -> Result<Vec<RawPoi>, GeoError> {
    let elements = json
        .get("elements")
        .and_then(Value::as_array)
        .ok_or_else(|| GeoError::Decode {
            service: SERVICE,
            message: String::from("response has no elements array"),
        })?;

    let mut pois = Vec::with_capacity(elements.len());
    for element in elements {
        match serde_json::from_value::<RawPoi>(element.clone()) {
            Ok(poi) => pois.push(poi),
            Err(e) => tracing::debug!(error = %e, "Skipping unrecognized POI element"),
        }
    }
    Ok(pois)
}
