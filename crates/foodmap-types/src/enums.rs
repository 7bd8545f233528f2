//! Enumeration types for the Food Map tracker.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Place categories
// ---------------------------------------------------------------------------

/// The kind of food venue a place is.
///
/// Live POI data tags venues with an `amenity` value; anything the
/// tracker does not recognize (or a missing tag) normalizes to
/// [`Category::Unspecified`] instead of being carried as an absent field.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Category {
    /// Sit-down restaurant.
    Restaurant,
    /// Coffee shop or cafe.
    Cafe,
    /// Fast food counter.
    FastFood,
    /// Category unknown or not one of the above.
    #[default]
    Unspecified,
}

impl Category {
    /// All categories that live POI queries ask for.
    pub const QUERYABLE: [Self; 3] = [Self::Restaurant, Self::Cafe, Self::FastFood];

    /// Map an `amenity` tag value onto a category.
    pub fn from_amenity(amenity: Option<&str>) -> Self {
        match amenity.map(str::trim) {
            Some("restaurant") => Self::Restaurant,
            Some("cafe") => Self::Cafe,
            Some("fast_food") => Self::FastFood,
            _ => Self::Unspecified,
        }
    }

    /// The wire name, identical to the `amenity` tag for queryable categories.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::FastFood => "fast_food",
            Self::Unspecified => "unspecified",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Ok(Self::Restaurant),
            "cafe" => Ok(Self::Cafe),
            "fast_food" | "fast-food" | "fastfood" => Ok(Self::FastFood),
            "unspecified" => Ok(Self::Unspecified),
            _ => Err(UnknownVariant(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// How the user felt about a food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Rating {
    /// Would order again.
    Liked,
    /// Neither good nor bad.
    Neutral,
    /// Avoid next time.
    Disliked,
}

impl Rating {
    /// The wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Liked => "liked",
            Self::Neutral => "neutral",
            Self::Disliked => "disliked",
        }
    }
}

impl core::fmt::Display for Rating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = UnknownVariant;

    /// Parse a submitted form value. Matching is case-insensitive and
    /// ignores surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "liked" => Ok(Self::Liked),
            "neutral" => Ok(Self::Neutral),
            "disliked" => Ok(Self::Disliked),
            _ => Err(UnknownVariant(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// POI element kinds
// ---------------------------------------------------------------------------

/// The element type of a raw POI entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum PoiKind {
    /// A single point.
    Node,
    /// A polygon or line; located by its computed center.
    Way,
    /// A grouping of other elements; located by its computed center.
    Relation,
}

impl PoiKind {
    /// The wire name, used as the prefix of a live place id.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

/// A string did not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl core::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unrecognized value {:?}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_parse_is_case_insensitive() {
        assert_eq!("Liked".parse::<Rating>(), Ok(Rating::Liked));
        assert_eq!(" disliked ".parse::<Rating>(), Ok(Rating::Disliked));
        assert_eq!("NEUTRAL".parse::<Rating>(), Ok(Rating::Neutral));
    }

    #[test]
    fn rating_rejects_unknown() {
        let err = "loved".parse::<Rating>();
        assert_eq!(err, Err(UnknownVariant(String::from("loved"))));
        assert!("".parse::<Rating>().is_err());
    }

    #[test]
    fn rating_wire_format_is_lowercase() {
        let json = serde_json::to_string(&Rating::Disliked).ok();
        assert_eq!(json.as_deref(), Some("\"disliked\""));
    }

    #[test]
    fn category_from_amenity() {
        assert_eq!(Category::from_amenity(Some("cafe")), Category::Cafe);
        assert_eq!(Category::from_amenity(Some("fast_food")), Category::FastFood);
        assert_eq!(Category::from_amenity(Some("pub")), Category::Unspecified);
        assert_eq!(Category::from_amenity(None), Category::Unspecified);
    }

    #[test]
    fn category_wire_format_is_snake_case() {
        let json = serde_json::to_string(&Category::FastFood).ok();
        assert_eq!(json.as_deref(), Some("\"fast_food\""));
        assert_eq!("fast-food".parse::<Category>(), Ok(Category::FastFood));
    }
}
