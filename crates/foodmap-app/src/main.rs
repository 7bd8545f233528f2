//! Food Map binary.
//!
//! Loads configuration, restores the experience log from disk, installs
//! the seed catalog and serves the JSON API until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `foodmap-config.yaml` (or `FOODMAP_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Restore the experience log, starting empty if it is unreadable
//! 4. Install the seed catalog and regions
//! 5. Enable live city search if configured
//! 6. Start the API server
//! 7. Optionally load the configured initial city in the background
//! 8. Wait for Ctrl-C and shut down gracefully

mod config;
mod error;

use std::path::PathBuf;
use std::sync::Arc;

use foodmap_catalog::{CatalogError, LoadResolution, seed_catalog, seed_regions};
use foodmap_geo::LiveCatalogSource;
use foodmap_server::{AppState, CatalogState, spawn_server};
use foodmap_store::{ExperienceStore, FileSink, LoadedStore};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat, LoggingConfig};
use crate::error::AppError;

/// Default config file, relative to the working directory.
const CONFIG_FILE: &str = "foodmap-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the seed catalog, live search
/// settings or the server fail during startup.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration. Logging depends on it, so report afterwards.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("foodmap starting");
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }

    // 3. Restore the experience log.
    let sink = FileSink::new(&config.storage.data_dir, &config.storage.key);
    let sink_path = sink.path().to_path_buf();
    let LoadedStore { store, warning } = ExperienceStore::load(sink);
    if let Some(warning) = warning {
        warn!(
            path = %sink_path.display(),
            reason = %warning.reason,
            "Stored experiences were unreadable, starting with an empty log"
        );
    }
    info!(
        path = %sink_path.display(),
        places = store.place_ids().count(),
        records = store.total_records(),
        "Experience log restored"
    );

    // 4. Seed catalog and regions.
    let catalog = seed_catalog()?;
    let regions = seed_regions();
    info!(
        places = catalog.len(),
        regions = regions.len(),
        "Seed catalog installed"
    );

    // 5. Live city search.
    let mut state = AppState::new(store, catalog, regions);
    if config.catalog.live_search {
        let source = LiveCatalogSource::new(&config.geo)?;
        state = state.with_live_source(source);
        info!(
            nominatim_url = %config.geo.nominatim_url,
            overpass_url = %config.geo.overpass_url,
            "Live city search enabled"
        );
    } else {
        info!("Live city search disabled");
    }
    let state = Arc::new(state);

    // 6. Start the API server.
    let server = spawn_server(&config.server, Arc::clone(&state)).await?;
    info!(addr = %server.addr(), "API server started");

    // 7. Initial city, raced like any other reload.
    if let Some(city) = config.catalog.initial_city.clone() {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            load_initial_city(&state, &city).await;
        });
    }

    // 8. Run until interrupted.
    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");
    server.shutdown().await;
    info!("foodmap stopped");
    Ok(())
}

/// Load configuration from `FOODMAP_CONFIG` or `foodmap-config.yaml`.
///
/// Returns the path the configuration came from, or `None` if no file
/// existed and defaults (plus environment overrides) were used.
fn load_config() -> Result<(AppConfig, Option<PathBuf>), AppError> {
    let config_path = std::env::var("FOODMAP_CONFIG")
        .map_or_else(|_| PathBuf::from(CONFIG_FILE), PathBuf::from);
    if config_path.exists() {
        let config = AppConfig::from_file(&config_path)?;
        Ok((config, Some(config_path)))
    } else {
        let mut config = AppConfig::default();
        config.apply_env_overrides()?;
        Ok((config, None))
    }
}

/// Install the global tracing subscriber.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Replace the seed catalog with a city search, unless a reload made
/// through the API has started in the meantime.
async fn load_initial_city(state: &AppState, city: &str) {
    let Some(live) = &state.live else {
        warn!(city, "initial_city is set but live search is disabled, keeping seed catalog");
        return;
    };

    let ticket = state.catalog.write().await.loader.begin();
    info!(city, generation = ticket.generation(), "Loading initial city");
    let result = live.fetch(city).await.map_err(CatalogError::from);

    let mut catalog = state.catalog.write().await;
    let CatalogState { loader, status } = &mut *catalog;
    match loader.complete(ticket, result, status) {
        LoadResolution::Applied { place_count, .. } => {
            info!(city, place_count, "Initial city loaded");
        }
        LoadResolution::Failed { error, .. } => {
            warn!(city, error = %error, "Initial city failed to load, keeping seed catalog");
        }
        LoadResolution::Stale { latest, .. } => {
            info!(city, latest, "Initial city superseded by a newer reload");
        }
    }
}

#[cfg(test)]
mod tests {
    use foodmap_store::MemorySink;

    use super::*;

    fn seeded_state() -> AppState {
        let Ok(catalog) = seed_catalog() else {
            panic!("seed catalog should build");
        };
        AppState::new(
            ExperienceStore::new(MemorySink::new()),
            catalog,
            seed_regions(),
        )
    }

    #[tokio::test]
    async fn initial_city_without_live_search_keeps_seed() {
        let state = seeded_state();
        load_initial_city(&state, "Tokyo").await;

        let catalog = state.catalog.read().await;
        assert_eq!(catalog.loader.installed_generation(), 0);
        assert_eq!(catalog.loader.current().len(), 5);
        assert_eq!(catalog.status.replacements, 0);
        assert!(catalog.status.last_error.is_none());
    }

    #[tokio::test]
    async fn unreachable_initial_city_records_failure() {
        let geo = foodmap_geo::GeoConfig {
            nominatim_url: String::from("http://127.0.0.1:9"),
            overpass_url: String::from("http://127.0.0.1:9/api/interpreter"),
            timeout_secs: 2,
            ..foodmap_geo::GeoConfig::default()
        };
        let Ok(source) = LiveCatalogSource::new(&geo) else {
            panic!("geo config should be valid");
        };
        let state = seeded_state().with_live_source(source);
        load_initial_city(&state, "Tokyo").await;

        let catalog = state.catalog.read().await;
        assert_eq!(catalog.loader.installed_generation(), 0);
        assert_eq!(catalog.loader.current().len(), 5);
        assert!(catalog.status.last_error.is_some());
    }
}
