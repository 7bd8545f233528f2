//! Place catalog for the Food Map tracker.
//!
//! This crate models the working set of places shown on the map: an
//! immutable [`PlaceCatalog`] snapshot, the filters the map applies to it,
//! the built-in seed list, normalization of live POI query results, and
//! the [`CatalogLoader`] that makes sure only the newest live load wins.
//!
//! # Modules
//!
//! - [`catalog`] -- [`PlaceCatalog`] snapshot with id lookup and bounds.
//! - [`error`] -- Error types for catalog construction and loading.
//! - [`filter`] -- Name, category, region and proximity filtering.
//! - [`loader`] -- Load tickets, stale-result discarding and listeners.
//! - [`poi`] -- Raw POI to [`Place`] normalization.
//! - [`seed`] -- Default five-place catalog and zoom regions.
//!
//! [`Place`]: foodmap_types::Place

pub mod catalog;
pub mod error;
pub mod filter;
pub mod loader;
pub mod poi;
pub mod seed;

// Re-export primary types at crate root.
pub use catalog::{CatalogSource, PlaceCatalog};
pub use error::CatalogError;
pub use filter::{DEFAULT_RADIUS_M, PlaceFilter, Proximity, distance_m};
pub use loader::{CatalogListener, CatalogLoader, LoadResolution, LoadTicket, NoOpListener};
pub use poi::{UNNAMED_PLACE, catalog_from_pois, places_from_pois};
pub use seed::{find_region, seed_catalog, seed_places, seed_regions};
