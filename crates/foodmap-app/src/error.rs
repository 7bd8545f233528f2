//! Error types for the `foodmap` binary.
//!
//! [`AppError`] wraps every failure mode during startup so `main` can
//! propagate with `?`.

/// Top-level error for the `foodmap` binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// The seed catalog could not be built.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: foodmap_catalog::CatalogError,
    },

    /// Live search settings were rejected.
    #[error("geo error: {source}")]
    Geo {
        /// The underlying geo error.
        #[from]
        source: foodmap_geo::GeoError,
    },

    /// The API server failed to start.
    #[error("server error: {source}")]
    Server {
        /// The underlying startup error.
        #[from]
        source: foodmap_server::StartupError,
    },

    /// Waiting for the shutdown signal failed.
    #[error("signal error: {source}")]
    Signal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
