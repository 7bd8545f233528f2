//! Error types for the `foodmap-catalog` crate.

use foodmap_types::PlaceId;

/// Errors that can occur while building or loading a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Two places in one snapshot share an id.
    #[error("duplicate place id: {0}")]
    DuplicatePlace(PlaceId),

    /// The upstream source (geocoder, POI query) failed.
    #[error("catalog source failed: {0}")]
    Source(String),
}
