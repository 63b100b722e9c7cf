//! File-backed tip history store
//!
//! Provides a `CacheStore` that keeps an ordered, size-bounded history of
//! generated tips in a single JSON file, rewritten atomically on every
//! successful append.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One generated tip bound to the calendar date it was produced on
///
/// Immutable once created: entries are only ever appended to the history,
/// never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipEntry {
    /// UTC calendar date the tip was generated on
    pub date: NaiveDate,
    /// The tip text, trimmed and non-empty
    pub text: String,
}

/// On-disk layout of the history file
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    /// Retained tips, oldest first
    #[serde(default)]
    history: Vec<TipEntry>,
}

/// Errors that can occur when persisting the tip history
#[derive(Debug, Error)]
pub enum StoreError {
    /// The history file could not be written to disk
    #[error("failed to persist tip history: {0}")]
    Write(#[from] io::Error),
}

/// Durable, bounded, insertion-ordered history of generated tips
///
/// The store exclusively owns the in-memory history and is the only
/// component that mutates or persists it. Appends trim the history to the
/// last `history_size` entries and rewrite the backing file before the
/// in-memory state is updated, so memory and disk never diverge after a
/// failed write.
#[derive(Debug)]
pub struct CacheStore {
    /// Path of the JSON history file
    path: PathBuf,
    /// Maximum number of entries retained
    history_size: usize,
    /// In-memory copy of the persisted history, oldest first
    state: Mutex<Vec<TipEntry>>,
}

impl CacheStore {
    /// Opens the store, loading any persisted history.
    ///
    /// A missing file yields an empty history. An unreadable or corrupt
    /// file is recovered as an empty history and logged; it is never a
    /// fatal startup condition.
    pub fn open(path: PathBuf, history_size: usize) -> Self {
        let history = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<CacheFile>(&contents) {
                Ok(file) => file.history,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "tip history file is corrupt, starting with an empty history"
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "tip history file is unreadable, starting with an empty history"
                );
                Vec::new()
            }
        };

        Self {
            path,
            history_size,
            state: Mutex::new(history),
        }
    }

    /// Returns the most recently appended entry for `date`, if any.
    ///
    /// Scans from the back so that when a date holds more than one entry
    /// (after a forced refresh) the newest one wins.
    pub fn latest_for(&self, date: NaiveDate) -> Option<TipEntry> {
        let state = self.state.lock().expect("tip history lock poisoned");
        state.iter().rev().find(|entry| entry.date == date).cloned()
    }

    /// Appends an entry, trims the history to the retention bound, and
    /// persists the result.
    ///
    /// The file is rewritten before the in-memory state is replaced: if the
    /// write fails the store still reflects what is on disk, and the append
    /// is reported as failed.
    pub fn append(&self, entry: TipEntry) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("tip history lock poisoned");

        let mut next = state.clone();
        next.push(entry);
        if next.len() > self.history_size {
            let excess = next.len() - self.history_size;
            next.drain(..excess);
        }

        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    /// Returns the full retained history, oldest first.
    pub fn all(&self) -> Vec<TipEntry> {
        let state = self.state.lock().expect("tip history lock poisoned");
        state.clone()
    }

    /// Writes the given history to disk as a single atomic replacement.
    fn persist(&self, history: &[TipEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = CacheFile {
            history: history.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        // Write to a temp file and rename it into place so a crash mid-write
        // cannot leave a half-written history behind.
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
