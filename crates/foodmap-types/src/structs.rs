//! Core entity structs: places, experience records, and raw POI entries.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Category, PoiKind, Rating};
use crate::ids::PlaceId;

/// Per-place experience log: place id to records, oldest first.
pub type ExperienceMap = BTreeMap<PlaceId, Vec<ExperienceRecord>>;

// ---------------------------------------------------------------------------
// Places
// ---------------------------------------------------------------------------

/// An addressable point of interest with coordinates and a food list.
///
/// Places are built in bulk when a catalog loads and never mutated
/// afterwards; the next load replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Place {
    /// Stable identifier, unique within one catalog snapshot.
    pub id: PlaceId,
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Venue kind.
    pub category: Category,
    /// Orderable foods, in menu order. Empty when unknown.
    pub foods: Vec<String>,
    /// Region the place belongs to, when the source knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// A named map region the user can zoom to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Region {
    /// Region name, matched against [`Place::region`].
    pub name: String,
    /// Latitude of the region's center.
    pub latitude: f64,
    /// Longitude of the region's center.
    pub longitude: f64,
    /// Map zoom level that frames the region.
    pub zoom: u8,
}

/// An axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BoundingBox {
    /// Southern edge (minimum latitude).
    pub south: f64,
    /// Northern edge (maximum latitude).
    pub north: f64,
    /// Western edge (minimum longitude).
    pub west: f64,
    /// Eastern edge (maximum longitude).
    pub east: f64,
}

// ---------------------------------------------------------------------------
// Raw POI entries
// ---------------------------------------------------------------------------

/// A computed center point attached to area-like POI elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PoiCenter {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// One element from a POI query, before normalization into a [`Place`].
///
/// Nodes carry `lat`/`lon` directly; ways and relations only carry a
/// `center`. Tags are free-form and any of them may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RawPoi {
    /// Element type.
    #[serde(rename = "type")]
    pub kind: PoiKind,
    /// Element id, unique per kind.
    pub id: u64,
    /// Direct latitude, present on nodes.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Direct longitude, present on nodes.
    #[serde(default)]
    pub lon: Option<f64>,
    /// Computed center, present on ways and relations.
    #[serde(default)]
    pub center: Option<PoiCenter>,
    /// Element tags (`name`, `amenity`, `cuisine`, ...).
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Experiences
// ---------------------------------------------------------------------------

/// A user's note about one food at one place.
///
/// Records are immutable once appended to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExperienceRecord {
    /// The food eaten. Usually one of the place's foods; not enforced.
    pub food: String,
    /// How it went.
    pub rating: Rating,
    /// Free text, may be empty.
    #[serde(default)]
    pub notes: String,
    /// Calendar date the record was logged.
    #[serde(with = "record_date")]
    #[ts(type = "string")]
    pub date: NaiveDate,
}

impl ExperienceRecord {
    /// Whether the record should be resurfaced when the place is revisited.
    pub fn is_reminder(&self) -> bool {
        self.rating == Rating::Disliked || !self.notes.is_empty()
    }
}

/// An unvalidated experience as submitted by a presentation layer.
///
/// `rating` stays a raw string here; the store parses it and rejects
/// anything outside the three known values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ExperienceDraft {
    /// The food eaten.
    #[serde(default)]
    pub food: String,
    /// Raw rating value (`liked`, `neutral`, `disliked`).
    #[serde(default)]
    pub rating: String,
    /// Free text.
    #[serde(default)]
    pub notes: String,
    /// Logging date; today when absent.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub date: Option<NaiveDate>,
}

impl ExperienceDraft {
    /// Build a draft dated at append time.
    pub fn new(food: impl Into<String>, rating: impl Into<String>, notes: impl Into<String>) -> Self {
        Self {
            food: food.into(),
            rating: rating.into(),
            notes: notes.into(),
            date: None,
        }
    }

    /// Pin the draft to a specific logging date.
    #[must_use]
    pub const fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// A liked food and the place it was had at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LikedFood {
    /// The food.
    pub food: String,
    /// Where it was eaten.
    pub place_id: PlaceId,
}

/// Serde adapter for record dates.
///
/// Writes ISO `YYYY-MM-DD`. Reads ISO, and also the locale-dependent
/// forms older browser exports produced via `toLocaleDateString`:
/// `M/D/YYYY`, `D/M/YYYY`, `YYYY/M/D` and `D.M.YYYY`.
///
/// Slash dates with a year last are ambiguous. They are read month first,
/// falling back to day first only when that is the sole valid reading, so
/// `3/4/2024` is March 4 and `14/3/2024` is March 14.
pub mod record_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const ISO: &str = "%Y-%m-%d";
    /// Legacy forms, in the order they are tried.
    const LEGACY: [&str; 4] = ["%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%d.%m.%Y"];

    /// Serialize a date as `YYYY-MM-DD`.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(ISO))
    }

    /// Deserialize a date from any accepted form.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid date {raw:?}, expected YYYY-MM-DD, M/D/YYYY, D/M/YYYY, YYYY/M/D or D.M.YYYY"
            ))
        })
    }

    /// Parse a date string in any accepted form.
    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim().trim_end_matches('.');
        std::iter::once(ISO)
            .chain(LEGACY)
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    #[test]
    fn record_date_writes_iso() {
        let record = ExperienceRecord {
            food: String::from("Latte"),
            rating: Rating::Liked,
            notes: String::new(),
            date: date(2024, 1, 1),
        };
        let json = serde_json::to_value(&record).ok();
        assert_eq!(
            json.as_ref().and_then(|v| v.get("date")).and_then(|v| v.as_str()),
            Some("2024-01-01")
        );
    }

    #[test]
    fn record_date_reads_legacy_locale_form() {
        let json = r#"{"food":"Gyoza","rating":"disliked","notes":"soggy","date":"3/7/2024"}"#;
        let record: Result<ExperienceRecord, _> = serde_json::from_str(json);
        assert_eq!(record.ok().map(|r| r.date), Some(date(2024, 3, 7)));
    }

    #[test]
    fn record_date_reads_other_locale_forms() {
        assert_eq!(record_date::parse("14/03/2024"), Some(date(2024, 3, 14)));
        assert_eq!(record_date::parse("2024/3/14"), Some(date(2024, 3, 14)));
        assert_eq!(record_date::parse("14.3.2024"), Some(date(2024, 3, 14)));
        assert_eq!(record_date::parse("14.3.2024."), Some(date(2024, 3, 14)));
    }

    #[test]
    fn ambiguous_slash_date_reads_month_first() {
        assert_eq!(record_date::parse("3/4/2024"), Some(date(2024, 3, 4)));
        assert_eq!(record_date::parse("13/4/2024"), Some(date(2024, 4, 13)));
    }

    #[test]
    fn record_date_rejects_garbage() {
        let json = r#"{"food":"Gyoza","rating":"liked","notes":"","date":"yesterday"}"#;
        let record: Result<ExperienceRecord, _> = serde_json::from_str(json);
        assert!(record.is_err());
    }

    #[test]
    fn missing_notes_default_to_empty() {
        let json = r#"{"food":"Bagel","rating":"neutral","date":"2024-02-02"}"#;
        let record: Result<ExperienceRecord, _> = serde_json::from_str(json);
        assert_eq!(record.ok().map(|r| r.notes), Some(String::new()));
    }

    #[test]
    fn reminder_criteria() {
        let base = ExperienceRecord {
            food: String::from("Quiche"),
            rating: Rating::Liked,
            notes: String::new(),
            date: date(2024, 5, 5),
        };
        assert!(!base.is_reminder());

        let disliked = ExperienceRecord {
            rating: Rating::Disliked,
            ..base.clone()
        };
        assert!(disliked.is_reminder());

        let annotated = ExperienceRecord {
            notes: String::from("ask for less sugar"),
            ..base.clone()
        };
        assert!(annotated.is_reminder());

        let neutral = ExperienceRecord {
            rating: Rating::Neutral,
            ..base
        };
        assert!(!neutral.is_reminder());
    }

    #[test]
    fn raw_poi_accepts_center_only_way() {
        let json = r#"{"type":"way","id":7,"center":{"lat":1.5,"lon":2.5},"tags":{"amenity":"cafe"}}"#;
        let poi: Result<RawPoi, _> = serde_json::from_str(json);
        let poi = poi.ok();
        assert_eq!(poi.as_ref().map(|p| p.kind), Some(PoiKind::Way));
        assert!(poi.as_ref().is_some_and(|p| p.lat.is_none() && p.center.is_some()));
    }
}
