//! Experience store for the Food Map tracker.
//!
//! The store is a per-place, append-only log of what the user ate and how
//! it went. It is keyed by opaque place ids so it survives catalog
//! replacements, writes itself through to a [`PersistenceSink`] after every
//! mutation, and recovers from unreadable persisted state by starting
//! empty with a [`CorruptStateWarning`].
//!
//! # Modules
//!
//! - [`codec`] -- JSON text form used for persistence, export and import.
//! - [`error`] -- Validation, parse, persistence and codec errors.
//! - [`sink`] -- [`PersistenceSink`] trait with file and in-memory sinks.
//! - [`store`] -- [`ExperienceStore`] queries and commands.

pub mod codec;
pub mod error;
pub mod sink;
pub mod store;

// Re-export primary types at crate root.
pub use codec::{decode, encode, encode_pretty};
pub use error::{CodecError, CorruptStateWarning, ParseError, PersistenceError, ValidationError};
pub use sink::{DEFAULT_KEY, FileSink, MemorySink, PersistenceSink};
pub use store::{AppendReceipt, ExperienceStore, LoadedStore, MergeReport, PersistOutcome};
