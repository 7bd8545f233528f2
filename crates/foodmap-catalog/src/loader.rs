//! Catalog load sequencing.
//!
//! Live loads are slow (a geocode round trip followed by a POI query) and
//! the user can start a new search before the previous one returns. The
//! [`CatalogLoader`] hands out a [`LoadTicket`] per load and, when results
//! come back, installs only the one belonging to the most recently started
//! load. Anything older is discarded, never merged.
//!
//! A failed load leaves the current catalog in place. Listeners hear about
//! exactly one outcome per applied load: a replacement or a failure.

use crate::catalog::PlaceCatalog;
use crate::error::CatalogError;

/// Receives catalog outcomes.
pub trait CatalogListener: Send {
    /// Called after a new catalog has been installed.
    fn on_catalog_replaced(&mut self, catalog: &PlaceCatalog);

    /// Called when the newest load failed; the previous catalog stays.
    fn on_catalog_load_failed(&mut self, error: &CatalogError);
}

/// A listener that ignores every outcome.
pub struct NoOpListener;

impl CatalogListener for NoOpListener {
    fn on_catalog_replaced(&mut self, _catalog: &PlaceCatalog) {}

    fn on_catalog_load_failed(&mut self, _error: &CatalogError) {}
}

/// Proof that a load was started, carrying its generation number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// The generation this ticket was issued for.
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// What happened to a completed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResolution {
    /// The catalog was replaced.
    Applied {
        /// Generation of the installed catalog.
        generation: u64,
        /// Number of places in the new catalog.
        place_count: usize,
    },
    /// The newest load failed; the previous catalog is untouched.
    Failed {
        /// Generation of the failed load.
        generation: u64,
        /// Why it failed.
        error: CatalogError,
    },
    /// A newer load was started after this one; the result was dropped.
    Stale {
        /// Generation of the discarded load.
        generation: u64,
        /// Generation of the newest load.
        latest: u64,
    },
}

/// Holds the current catalog and decides which load results to apply.
#[derive(Debug)]
pub struct CatalogLoader {
    current: PlaceCatalog,
    /// Generation of the most recently started load.
    latest: u64,
    /// Generation of the installed catalog (0 for the initial one).
    installed: u64,
}

impl CatalogLoader {
    /// Create a loader around an initial catalog.
    pub const fn new(initial: PlaceCatalog) -> Self {
        Self {
            current: initial,
            latest: 0,
            installed: 0,
        }
    }

    /// The catalog currently in effect.
    pub const fn current(&self) -> &PlaceCatalog {
        &self.current
    }

    /// Generation of the installed catalog.
    pub const fn installed_generation(&self) -> u64 {
        self.installed
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin(&mut self) -> LoadTicket {
        self.latest = self.latest.saturating_add(1);
        tracing::debug!(generation = self.latest, "Catalog load started");
        LoadTicket {
            generation: self.latest,
        }
    }

    /// Whether `ticket` still belongs to the newest load.
    pub const fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.latest
    }

    /// Finish a load, applying its result only if it is the newest.
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<PlaceCatalog, CatalogError>,
        listener: &mut dyn CatalogListener,
    ) -> LoadResolution {
        let generation = ticket.generation;
        if !self.is_current(ticket) {
            tracing::debug!(generation, latest = self.latest, "Stale catalog load discarded");
            return LoadResolution::Stale {
                generation,
                latest: self.latest,
            };
        }

        match result {
            Ok(catalog) => {
                let place_count = catalog.len();
                self.current = catalog;
                self.installed = generation;
                tracing::info!(generation, place_count, "Catalog replaced");
                listener.on_catalog_replaced(&self.current);
                LoadResolution::Applied {
                    generation,
                    place_count,
                }
            }
            Err(error) => {
                tracing::warn!(generation, error = %error, "Catalog load failed, keeping previous catalog");
                listener.on_catalog_load_failed(&error);
                LoadResolution::Failed { generation, error }
            }
        }
    }
}
