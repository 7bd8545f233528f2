//! Shared application state for the API server.
//!
//! The experience store sits behind a [`Mutex`]: every append or import
//! and its write-through happen while the lock is held, so no request can
//! observe a half-applied merge. Mutations run on the blocking pool, since
//! the write-through does file I/O; the store is shared through an [`Arc`]
//! for that reason. The catalog sits behind a [`RwLock`];
//! reads share it and only load bookkeeping takes the write side. Network
//! fetches for a live reload run with neither lock held.

use std::sync::Arc;

use foodmap_catalog::{CatalogError, CatalogListener, CatalogLoader, PlaceCatalog};
use foodmap_geo::LiveCatalogSource;
use foodmap_store::ExperienceStore;
use foodmap_types::Region;
use tokio::sync::{Mutex, RwLock};

/// Outcome bookkeeping for catalog loads, fed by the loader.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CatalogStatus {
    /// Number of catalogs installed since startup.
    pub replacements: u64,
    /// Message of the most recent failed load, cleared on success.
    pub last_error: Option<String>,
}

impl CatalogListener for CatalogStatus {
    fn on_catalog_replaced(&mut self, _catalog: &PlaceCatalog) {
        self.replacements = self.replacements.saturating_add(1);
        self.last_error = None;
    }

    fn on_catalog_load_failed(&mut self, error: &CatalogError) {
        self.last_error = Some(error.to_string());
    }
}

/// The catalog loader together with its status listener.
#[derive(Debug)]
pub struct CatalogState {
    /// Current catalog and load sequencing.
    pub loader: CatalogLoader,
    /// What the last loads did.
    pub status: CatalogStatus,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Debug)]
pub struct AppState {
    /// The experience log.
    pub store: Arc<Mutex<ExperienceStore>>,
    /// The place catalog in effect.
    pub catalog: RwLock<CatalogState>,
    /// Live city search, absent when disabled.
    pub live: Option<LiveCatalogSource>,
    /// Regions the map can zoom to.
    pub regions: Vec<Region>,
}

impl AppState {
    /// Create state around a loaded store and an initial catalog.
    pub fn new(store: ExperienceStore, catalog: PlaceCatalog, regions: Vec<Region>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            catalog: RwLock::new(CatalogState {
                loader: CatalogLoader::new(catalog),
                status: CatalogStatus::default(),
            }),
            live: None,
            regions,
        }
    }

    /// Enable live city search.
    #[must_use]
    pub fn with_live_source(mut self, source: LiveCatalogSource) -> Self {
        self.live = Some(source);
        self
    }
}
