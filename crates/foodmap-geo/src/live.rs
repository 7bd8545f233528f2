//! City search: geocode a name, query POIs in its box, build a catalog.

use foodmap_catalog::{CatalogError, PlaceCatalog, catalog_from_pois};
use foodmap_types::Category;

use crate::config::GeoConfig;
use crate::error::GeoError;
use crate::geocode::Geocoder;
use crate::overpass::PoiClient;

/// Builds live catalogs from the geocoder and the POI service.
#[derive(Debug, Clone)]
pub struct LiveCatalogSource {
    geocoder: Geocoder,
    pois: PoiClient,
}

impl LiveCatalogSource {
    /// Create a source with one shared HTTP client for both services.
    pub fn new(config: &GeoConfig) -> Result<Self, GeoError> {
        config.validate()?;
        let client = config.http_client()?;
        Ok(Self {
            geocoder: Geocoder::with_client(client.clone(), &config.nominatim_url),
            pois: PoiClient::with_client(client, &config.overpass_url),
        })
    }

    /// Fetch the food places of `city` as a fresh catalog.
    ///
    /// An unknown city is [`GeoError::PlaceNotFound`]. A known city with no
    /// matching POIs yields an empty catalog.
    pub async fn fetch(&self, city: &str) -> Result<PlaceCatalog, GeoError> {
        let city = city.trim();
        let bbox = self
            .geocoder
            .lookup(city)
            .await?
            .ok_or_else(|| GeoError::PlaceNotFound(city.to_owned()))?;

        let pois = self.pois.query(&bbox, &Category::QUERYABLE).await?;
        let catalog = catalog_from_pois(city, &pois).map_err(|e| GeoError::Decode {
            service: "overpass",
            message: e.to_string(),
        })?;
        tracing::info!(city, raw = pois.len(), places = catalog.len(), "Live catalog fetched");
        Ok(catalog)
    }
}

impl From<GeoError> for CatalogError {
    fn from(error: GeoError) -> Self {
        Self::Source(error.to_string())
    }
}
