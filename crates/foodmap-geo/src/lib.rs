//! Live place data for the Food Map tracker.
//!
//! Turns a free-text city name into a [`PlaceCatalog`] by asking a
//! Nominatim-compatible geocoder for the city's bounding box and then an
//! Overpass interpreter for the restaurants, cafes and fast food counters
//! inside it.
//!
//! Response parsing is kept in pure functions ([`parse_search_response`],
//! [`parse_elements`]) so it can be tested without a network.
//!
//! [`PlaceCatalog`]: foodmap_catalog::PlaceCatalog

pub mod config;
pub mod error;
pub mod geocode;
pub mod live;
pub mod overpass;

// Re-export primary types at crate root.
pub use config::{DEFAULT_NOMINATIM_URL, DEFAULT_OVERPASS_URL, GeoConfig};
pub use error::GeoError;
pub use geocode::{Geocoder, parse_search_response};
pub use live::LiveCatalogSource;
pub use overpass::{PoiClient, build_query, parse_elements};
