//! Structured store for the latest analysis record.
//!
//! The record is written and read as typed JSON via serde. Persisted text
//! is never evaluated or interpreted as anything but data.

use std::fs;
use std::path::PathBuf;

use crate::domain::AnalysisRecord;
use crate::Result;

/// File-backed store holding the most recent analysis outcome.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist a record, replacing any previous one.
    ///
    /// # Errors
    /// Returns error if serialization or the write fails.
    pub fn save(&self, record: &AnalysisRecord) -> Result<()> {
        let json = serde_json::to_vec_pretty(record)?;
        fs::write(&self.path, json)?;
        tracing::debug!("Saved analysis record {} to {}", record.id, self.path.display());
        Ok(())
    }

    /// Load the stored record, if any.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Option<AnalysisRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}
