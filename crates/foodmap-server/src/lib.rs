//! JSON API server for the Food Map tracker.
//!
//! This crate exposes the experience store and the place catalog to a
//! browser map page over HTTP:
//!
//! - **Place endpoints** for listing and filtering the current catalog
//!   (name, category, region, proximity)
//! - **Experience endpoints** for logging records per place and reading
//!   back history, reminders and liked-food insights
//! - **Catalog endpoints** for live city reloads, where only the most
//!   recently started reload is ever installed
//! - **Transfer endpoints** for exporting and importing the experience log
//!   as JSON text
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! All state lives in one [`AppState`] shared through an `Arc`. The store
//! is behind a mutex so each mutation and its write-through run as one
//! critical section; the catalog is behind a read-write lock and network
//! fetches run outside it.

pub mod catalog;
pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod transfer;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError};
pub use startup::{RunningServer, StartupError, spawn_server};
pub use state::{AppState, CatalogState, CatalogStatus};
