//! The place catalog: one immutable snapshot of addressable places.
//!
//! A [`PlaceCatalog`] is built in bulk from either the static seed list or
//! a transformed POI query, and is never edited afterwards. Reloading
//! produces a fresh catalog that replaces the old one wholesale.
//!
//! Places keep their source order (the order markers are rendered in);
//! a side index maps ids to positions for point lookups.

use std::collections::BTreeMap;

use foodmap_types::{BoundingBox, Place, PlaceId};
use serde::Serialize;

use crate::error::CatalogError;
use crate::filter::PlaceFilter;

/// Where a catalog snapshot came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogSource {
    /// The built-in seed list.
    Seed,
    /// A live geocode + POI query for a city.
    Live {
        /// The city name the user searched for.
        city: String,
    },
}

/// An immutable snapshot of places.
#[derive(Debug, Clone)]
pub struct PlaceCatalog {
    /// Places in source order.
    places: Vec<Place>,
    /// Id to position in `places`.
    index: BTreeMap<PlaceId, usize>,
    /// Provenance of this snapshot.
    source: CatalogSource,
}

impl PlaceCatalog {
    /// Build a catalog from a list of places.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicatePlace`] if two places share an id.
    pub fn new(places: Vec<Place>, source: CatalogSource) -> Result<Self, CatalogError> {
        let mut index = BTreeMap::new();
        for (position, place) in places.iter().enumerate() {
            if index.insert(place.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicatePlace(place.id.clone()));
            }
        }
        Ok(Self {
            places,
            index,
            source,
        })
    }

    /// An empty catalog, used before the first load completes.
    pub const fn empty(source: CatalogSource) -> Self {
        Self {
            places: Vec::new(),
            index: BTreeMap::new(),
            source,
        }
    }

    /// Look up a place by id.
    pub fn get(&self, id: &PlaceId) -> Option<&Place> {
        self.index.get(id).and_then(|&i| self.places.get(i))
    }

    /// Whether the catalog holds a place with this id.
    pub fn contains(&self, id: &PlaceId) -> bool {
        self.index.contains_key(id)
    }

    /// All places in source order.
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// All place ids in source order.
    pub fn ids(&self) -> Vec<PlaceId> {
        self.places.iter().map(|p| p.id.clone()).collect()
    }

    /// Number of places.
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// Whether the catalog has no places.
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Provenance of this snapshot.
    pub const fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Places matching every criterion in `filter`, in source order.
    pub fn filter(&self, filter: &PlaceFilter) -> Vec<&Place> {
        self.places.iter().filter(|p| filter.matches(p)).collect()
    }

    /// The smallest box covering every place in the catalog.
    pub fn bounds(&self) -> Option<BoundingBox> {
        crate::filter::bounds(self.places.iter())
    }
}
