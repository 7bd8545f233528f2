//! Place filtering: name search, category, region and proximity.
//!
//! Every criterion in a [`PlaceFilter`] is optional; an unset criterion
//! matches everything, so the default filter returns the whole catalog.

use foodmap_types::{BoundingBox, Category, Place};
use serde::Deserialize;

/// Mean Earth radius in meters, as used by web map libraries.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Default search radius for "near me" queries.
pub const DEFAULT_RADIUS_M: f64 = 10_000.0;

/// A point and a radius around it.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Proximity {
    /// Latitude of the center in degrees.
    pub latitude: f64,
    /// Longitude of the center in degrees.
    pub longitude: f64,
    /// Inclusive search radius in meters.
    pub radius_m: f64,
}

impl Proximity {
    /// A proximity query with the default radius.
    pub const fn around(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_m: DEFAULT_RADIUS_M,
        }
    }

    /// Whether a place lies within the radius.
    pub fn contains(&self, place: &Place) -> bool {
        distance_m(self.latitude, self.longitude, place.latitude, place.longitude) <= self.radius_m
    }
}

/// Combined place filter. All set criteria must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceFilter {
    /// Case-insensitive substring of the place name.
    pub query: Option<String>,
    /// Exact category.
    pub category: Option<Category>,
    /// Region name, compared case-insensitively.
    pub region: Option<String>,
    /// Maximum distance from a point.
    pub near: Option<Proximity>,
}

impl PlaceFilter {
    /// Filter by name substring.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Filter by category.
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Filter by region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Filter by distance.
    #[must_use]
    pub const fn near(mut self, proximity: Proximity) -> Self {
        self.near = Some(proximity);
        self
    }

    /// Whether `place` satisfies every set criterion.
    pub fn matches(&self, place: &Place) -> bool {
        if let Some(query) = self.query.as_deref() {
            let needle = query.trim().to_lowercase();
            if !needle.is_empty() && !place.name.to_lowercase().contains(&needle) {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != place.category) {
            return false;
        }
        if let Some(region) = self.region.as_deref() {
            let wanted = region.trim();
            let same = place
                .region
                .as_deref()
                .is_some_and(|r| r.eq_ignore_ascii_case(wanted));
            if !same {
                return false;
            }
        }
        self.near.is_none_or(|near| near.contains(place))
    }
}

/// Great-circle distance between two coordinates in meters (haversine).
pub fn distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_M * c
}

/// The smallest box covering all given places, or `None` for no places.
pub fn bounds<'a>(places: impl IntoIterator<Item = &'a Place>) -> Option<BoundingBox> {
    places.into_iter().fold(None, |acc, p| {
        Some(acc.map_or(
            BoundingBox {
                south: p.latitude,
                north: p.latitude,
                west: p.longitude,
                east: p.longitude,
            },
            |b: BoundingBox| BoundingBox {
                south: b.south.min(p.latitude),
                north: b.north.max(p.latitude),
                west: b.west.min(p.longitude),
                east: b.east.max(p.longitude),
            },
        ))
    })
}

#[cfg(test)]
mod tests {
    use foodmap_types::PlaceId;

    use super::*;

    fn place(name: &str, category: Category, region: Option<&str>, lat: f64, lng: f64) -> Place {
        Place {
            id: PlaceId::from(name),
            name: name.to_owned(),
            latitude: lat,
            longitude: lng,
            category,
            foods: Vec::new(),
            region: region.map(str::to_owned),
        }
    }

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn default_filter_matches_everything() {
        let p = place("Anywhere", Category::Unspecified, None, 0.0, 0.0);
        assert!(PlaceFilter::default().matches(&p));
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let p = place("Café de Flore, Paris", Category::Cafe, Some("France"), 48.85, 2.35);
        assert!(PlaceFilter::default().with_query("paris").matches(&p));
        assert!(PlaceFilter::default().with_query("CAFÉ").matches(&p));
        assert!(!PlaceFilter::default().with_query("tokyo").matches(&p));
        assert!(PlaceFilter::default().with_query("  ").matches(&p));
    }

    #[test]
    fn category_and_region_criteria() {
        let p = place("Ichiran", Category::Restaurant, Some("Japan"), 35.6, 139.6);
        assert!(PlaceFilter::default().with_category(Category::Restaurant).matches(&p));
        assert!(!PlaceFilter::default().with_category(Category::Cafe).matches(&p));
        assert!(PlaceFilter::default().with_region("japan").matches(&p));
        assert!(!PlaceFilter::default().with_region("France").matches(&p));

        let no_region = place("Somewhere", Category::Cafe, None, 0.0, 0.0);
        assert!(!PlaceFilter::default().with_region("Japan").matches(&no_region));
    }

    #[test]
    fn haversine_known_distance() {
        // Paris to London is roughly 344 km.
        let d = distance_m(48.8566, 2.3522, 51.5074, -0.1278);
        assert!(close(d, 343_500.0, 2_000.0), "got {d}");
        assert!(close(distance_m(10.0, 10.0, 10.0, 10.0), 0.0, 1e-6));
    }

    #[test]
    fn proximity_uses_radius() {
        let p = place("Near", Category::Cafe, None, 40.7128, -74.0060);
        let here = Proximity::around(40.7300, -74.0000);
        assert!(here.contains(&p));

        let far = Proximity {
            latitude: 41.5,
            longitude: -74.0,
            radius_m: DEFAULT_RADIUS_M,
        };
        assert!(!far.contains(&p));
        assert!(!PlaceFilter::default().near(far).matches(&p));
    }

    #[test]
    fn bounds_cover_all_places() {
        let places = [
            place("a", Category::Cafe, None, 10.0, 20.0),
            place("b", Category::Cafe, None, -5.0, 30.0),
            place("c", Category::Cafe, None, 3.0, -40.0),
        ];
        let b = bounds(places.iter());
        assert!(b.is_some_and(|b| {
            close(b.south, -5.0, 1e-9)
                && close(b.north, 10.0, 1e-9)
                && close(b.west, -40.0, 1e-9)
                && close(b.east, 30.0, 1e-9)
        }));
        assert!(bounds(std::iter::empty()).is_none());
    }
}
