//! Discovery types

use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::types::{Coordinates, ExtractionKey, JsonValue};
use std::path::{Path, PathBuf};

/// A classified snapshot file that has not been read yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute or root-joined path on disk
    pub path: PathBuf,
    pub key: ExtractionKey,
    pub coords: Coordinates,
}

impl DiscoveredFile {
    /// Extractor registered for this file's key
    pub fn extractor(&self) -> Extractor {
        Extractor::for_key(self.key)
    }

    /// Read and parse the file
    ///
    /// Missing, unreadable and invalid JSON files all fail with
    /// `UnreadableFile`.
    pub fn load(&self) -> Result<SourceRecord> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::unreadable(&self.path, e.to_string()))?;
        let payload: JsonValue = serde_json::from_str(&content)
            .map_err(|e| Error::unreadable(&self.path, format!("invalid JSON: {e}")))?;

        Ok(SourceRecord {
            path: self.path.clone(),
            key: self.key,
            coords: self.coords.clone(),
            payload,
        })
    }
}

/// One parsed snapshot document, ready for extraction
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub path: PathBuf,
    pub key: ExtractionKey,
    pub coords: Coordinates,
    pub payload: JsonValue,
}

impl SourceRecord {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extractor(&self) -> Extractor {
        Extractor::for_key(self.key)
    }
}
