//! Built-in seed catalog and map regions.
//!
//! Seed places use their display name as id. Older experience exports
//! are keyed by place name, so importing them attaches records to the
//! right seed place without remapping.

use foodmap_types::{Category, Place, PlaceId, Region};

use crate::catalog::{CatalogSource, PlaceCatalog};
use crate::error::CatalogError;

/// Helper to build a seed [`Place`].
fn seed_place(
    name: &str,
    latitude: f64,
    longitude: f64,
    category: Category,
    foods: &[&str],
    region: &str,
) -> Place {
    Place {
        id: PlaceId::from(name),
        name: name.to_owned(),
        latitude,
        longitude,
        category,
        foods: foods.iter().map(|&f| f.to_owned()).collect(),
        region: Some(region.to_owned()),
    }
}

/// Helper to build a [`Region`].
fn region(name: &str, latitude: f64, longitude: f64, zoom: u8) -> Region {
    Region {
        name: name.to_owned(),
        latitude,
        longitude,
        zoom,
    }
}

/// The seed places, in display order.
pub fn seed_places() -> Vec<Place> {
    vec![
        seed_place(
            "But First Coffee, Santa Rosa",
            38.4404,
            -122.7141,
            Category::Cafe,
            &["Strawberry Frappe", "Vanilla Latte", "Croissant"],
            "USA",
        ),
        seed_place(
            "But First Coffee, Biñan",
            14.3347,
            121.0847,
            Category::Cafe,
            &["Strawberry Frappe", "Chocolate Mocha", "Bagel"],
            "Philippines",
        ),
        seed_place(
            "Ichiran Ramen, Tokyo",
            35.6762,
            139.6503,
            Category::Restaurant,
            &["Tonkotsu Ramen", "Miso Ramen", "Gyoza"],
            "Japan",
        ),
        seed_place(
            "Café de Flore, Paris",
            48.8566,
            2.3522,
            Category::Cafe,
            &["Croissant", "Espresso", "Quiche"],
            "France",
        ),
        seed_place(
            "Starbucks, New York",
            40.7128,
            -74.0060,
            Category::Cafe,
            &["Pumpkin Spice Latte", "Blueberry Muffin", "Chicken Sandwich"],
            "USA",
        ),
    ]
}

/// Build the seed catalog.
///
/// # Errors
///
/// Returns [`CatalogError::DuplicatePlace`] if the seed list repeats an id.
pub fn seed_catalog() -> Result<PlaceCatalog, CatalogError> {
    PlaceCatalog::new(seed_places(), CatalogSource::Seed)
}

/// Regions the map can zoom to, with the zoom level that frames each.
pub fn seed_regions() -> Vec<Region> {
    vec![
        region("Japan", 36.2048, 138.2529, 6),
        region("USA", 37.0902, -95.7129, 4),
        region("Philippines", 12.8797, 121.7740, 6),
        region("France", 46.2276, 2.2137, 6),
    ]
}

/// Look up a seed region by name, case-insensitively.
pub fn find_region(name: &str) -> Option<Region> {
    seed_regions()
        .into_iter()
        .find(|r| r.name.eq_ignore_ascii_case(name.trim()))
}
