//! Generation metadata persisted alongside generated cladding.
//!
//! The record carries enough to rebuild the same frame and parameters for an
//! edit: the resolved parameter set, the frame axes and the source face id.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::geom::FrameRecord;

use super::params::SidingParams;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid generation record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported record version {0} (this build reads {version})", version = crate::VERSION)]
    UnsupportedVersion(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub version: String,
    pub params: SidingParams,
    /// Stable identifier of the source face, when the host has one.
    #[serde(default)]
    pub face_id: Option<String>,
    pub frame: FrameRecord,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl GenerationRecord {
    /// New record stamped with the current UTC time and this crate's version.
    #[must_use]
    pub fn new(params: SidingParams, face_id: Option<String>, frame: FrameRecord) -> Self {
        Self {
            version: crate::VERSION.to_owned(),
            params,
            face_id,
            frame,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    /// # Errors
    /// Serialization failures from `serde_json`.
    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored record, rejecting other major versions.
    ///
    /// # Errors
    /// [`RecordError::Json`] for malformed input and
    /// [`RecordError::UnsupportedVersion`] for a foreign major version.
    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        let record: Self = serde_json::from_str(text)?;
        if major(&record.version) != major(crate::VERSION) {
            return Err(RecordError::UnsupportedVersion(record.version));
        }
        Ok(record)
    }
}

/// Whether `text` looks like a stored generation record.
#[must_use]
pub fn is_featheredge_json(text: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .is_some_and(|obj| ["version", "params", "frame"].iter().all(|k| obj.contains_key(*k)))
}

fn major(version: &str) -> &str {
    version.split('.').next().unwrap_or(version).trim()
}
