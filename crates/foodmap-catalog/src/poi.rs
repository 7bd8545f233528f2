//! Normalization of raw POI query results into [`Place`]s.
//!
//! POI data is loose: names go missing, area features only carry a
//! computed center, and the category tag can be anything. This module
//! is the boundary where all of that is fixed into the strict [`Place`]
//! shape so nothing downstream deals with absent fields.

use std::collections::BTreeSet;

use foodmap_types::{Category, Place, PlaceId, RawPoi};

use crate::catalog::{CatalogSource, PlaceCatalog};
use crate::error::CatalogError;

/// Name given to POIs that have no `name` tag.
pub const UNNAMED_PLACE: &str = "Unnamed place";

/// Foods assumed for a category when the POI lists no cuisine.
pub fn default_foods(category: Category) -> &'static [&'static str] {
    match category {
        Category::Restaurant => &["House Special", "Soup of the Day", "Dessert"],
        Category::Cafe => &["Coffee", "Tea", "Pastry"],
        Category::FastFood => &["Burger", "Fries", "Soft Drink"],
        Category::Unspecified => &[],
    }
}

/// Convert one raw POI into a place, or `None` if it has no usable coordinate.
pub fn place_from_poi(poi: &RawPoi) -> Option<Place> {
    let (latitude, longitude) = match (poi.lat, poi.lon, poi.center) {
        (Some(lat), Some(lon), _) => (lat, lon),
        (_, _, Some(center)) => (center.lat, center.lon),
        _ => return None,
    };

    let name = poi
        .tags
        .get("name")
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .unwrap_or(UNNAMED_PLACE)
        .to_owned();

    let category = Category::from_amenity(poi.tags.get("amenity").map(String::as_str));

    let foods = poi
        .tags
        .get("cuisine")
        .map(|c| parse_cuisine(c))
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| {
            default_foods(category)
                .iter()
                .map(|&f| f.to_owned())
                .collect()
        });

    Some(Place {
        id: PlaceId::new(format!("{}/{}", poi.kind.as_str(), poi.id)),
        name,
        latitude,
        longitude,
        category,
        foods,
        region: None,
    })
}

/// Convert a batch of POIs, skipping unlocatable and repeated elements.
///
/// Query results can list the same element twice when several clauses
/// match it; only the first occurrence is kept.
pub fn places_from_pois(pois: &[RawPoi]) -> Vec<Place> {
    let mut seen = BTreeSet::new();
    let mut places = Vec::with_capacity(pois.len());
    for poi in pois {
        let Some(place) = place_from_poi(poi) else {
            tracing::debug!(kind = poi.kind.as_str(), id = poi.id, "POI has no coordinate, skipped");
            continue;
        };
        if seen.insert(place.id.clone()) {
            places.push(place);
        }
    }
    places
}

/// Build a live catalog for `city` from raw POIs.
///
/// # Errors
///
/// Returns [`CatalogError::DuplicatePlace`] only if normalization produced
/// a repeated id, which deduplication rules out in practice.
pub fn catalog_from_pois(city: &str, pois: &[RawPoi]) -> Result<PlaceCatalog, CatalogError> {
    PlaceCatalog::new(
        places_from_pois(pois),
        CatalogSource::Live {
            city: city.to_owned(),
        },
    )
}

/// Split a `cuisine` tag (`"ramen;japanese"`) into display names.
fn parse_cuisine(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(|part| part.trim().replace('_', " "))
        .filter(|part| !part.is_empty())
        .map(|part| capitalize(&part))
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
