//! Shared type definitions for the Food Map tracker.
//!
//! This crate is the single source of truth for the data model shared by
//! the catalog, the experience store, the geo clients and the HTTP API.
//! Types flow downstream to `TypeScript` via `ts-rs` for the map frontend.
//!
//! # Modules
//!
//! - [`ids`] -- Opaque [`PlaceId`] wrapper
//! - [`enums`] -- Categories, ratings and POI element kinds
//! - [`structs`] -- Places, regions, raw POIs and experience records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Category, PoiKind, Rating, UnknownVariant};
pub use ids::PlaceId;
pub use structs::{
    BoundingBox, ExperienceDraft, ExperienceMap, ExperienceRecord, LikedFood, Place, PoiCenter,
    RawPoi, Region, record_date,
};
