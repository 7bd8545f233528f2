//! Opaque place identifiers.
//!
//! A [`PlaceId`] is whatever string the catalog source hands out: the
//! display name for seed places, `"node/123"`-style keys for live POIs.
//! Nothing downstream parses it. The experience store keys its log by
//! these ids and outlives every catalog snapshot, so an id is never
//! checked against the current catalog.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Identifier for a place, stable across catalog reloads from the same source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct PlaceId(pub String);

impl PlaceId {
    /// Create an identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the inner [`String`] value.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for PlaceId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaceId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for PlaceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<PlaceId> for String {
    fn from(id: PlaceId) -> Self {
        id.0
    }
}

impl AsRef<str> for PlaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
