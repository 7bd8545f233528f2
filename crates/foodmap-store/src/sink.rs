//! Persistence sinks: where the encoded store lives between sessions.
//!
//! A sink is addressed by a single fixed key and only ever holds one
//! text blob, the full encoded store. There is no quota contract; a
//! failed write is reported and the caller carries on with its in-memory
//! state.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::PersistenceError;

/// Key the store is kept under unless configured otherwise.
pub const DEFAULT_KEY: &str = "experiences";

/// A single-key text store that survives process restarts.
pub trait PersistenceSink: Send {
    /// Read the stored text, or `None` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>, PersistenceError>;

    /// Replace the stored text.
    fn write(&mut self, text: &str) -> Result<(), PersistenceError>;

    /// Short description for logs.
    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// File sink
// ---------------------------------------------------------------------------

/// Stores the text in `<dir>/<key>.json`.
///
/// Writes land in a sibling temporary file first and are then renamed
/// over the target, so readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// A sink for `key` inside `dir`. Nothing is touched until the first write.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{key}.json")),
        }
    }

    /// A sink for [`DEFAULT_KEY`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir, DEFAULT_KEY)
    }

    /// The file this sink reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PersistenceSink for FileSink {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&mut self, text: &str) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "Experiences written");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

// ---------------------------------------------------------------------------
// Memory sink
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryCell {
    text: Option<String>,
    writes: usize,
    fail_writes: bool,
}

/// An in-process sink. Clones share the same cell, so a test can keep
/// a handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    cell: Arc<Mutex<MemoryCell>>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink pre-loaded with `text`.
    pub fn with_contents(text: impl Into<String>) -> Self {
        let sink = Self::new();
        if let Ok(mut cell) = sink.cell.lock() {
            cell.text = Some(text.into());
        }
        sink
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut cell) = self.cell.lock() {
            cell.fail_writes = fail;
        }
    }

    /// Current stored text.
    pub fn contents(&self) -> Option<String> {
        self.cell.lock().ok().and_then(|cell| cell.text.clone())
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.cell.lock().map(|cell| cell.writes).unwrap_or_default()
    }
}

impl PersistenceSink for MemorySink {
    fn read(&self) -> Result<Option<String>, PersistenceError> {
        let cell = self
            .cell
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        Ok(cell.text.clone())
    }

    fn write(&mut self, text: &str) -> Result<(), PersistenceError> {
        let mut cell = self
            .cell
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        if cell.fail_writes {
            return Err(PersistenceError::Unavailable(String::from(
                "memory sink is refusing writes",
            )));
        }
        cell.text = Some(text.to_owned());
        cell.writes = cell.writes.saturating_add(1);
        Ok(())
    }

    fn describe(&self) -> String {
        String::from("memory")
    }
}
