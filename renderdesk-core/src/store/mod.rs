//! Preference persistence.
//!
//! A [`PreferenceStore`] owns exactly one [`PreferenceRecord`]. `load` never
//! fails because nothing was stored; it hands back the defaults instead.
//! `save` replaces the whole record. There is no conflict detection: the last
//! completed `save` wins.

mod memory;
mod sqlite;

pub use memory::MemoryPreferenceStore;
pub use sqlite::SqlitePreferenceStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{checked_scale, PreferenceRecord};

/// Settings key the export preferences are stored under.
pub const PREFERENCES_KEY: &str = "export_preferences";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to open preference store: {0}")]
    Open(String),
}

/// Persists and retrieves the export preference record.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Last persisted record, or [`PreferenceRecord::default`] if none exists.
    async fn load(&self) -> Result<PreferenceRecord, StorageError>;

    /// Replace the stored record and return what was persisted.
    async fn save(&self, record: PreferenceRecord) -> Result<PreferenceRecord, StorageError>;

    /// Forget the stored record so the next `load` returns defaults.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Decode a stored JSON document, treating garbage as "nothing stored".
pub(crate) fn decode_record(json: &str) -> PreferenceRecord {
    match serde_json::from_str::<PreferenceRecord>(json) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse stored preferences, using defaults");
            PreferenceRecord::default()
        }
    }
}

/// Bring a record into the persistable domain before writing it.
pub(crate) fn normalize_for_save(mut record: PreferenceRecord) -> PreferenceRecord {
    let (scale, correction) = checked_scale(i64::from(record.scale));
    if let Some(correction) = correction {
        tracing::warn!(%correction, "Clamping scale before save");
    }
    record.scale = scale;
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_record_valid() {
        let record = decode_record(r#"{"filename":"a","renditionType":"svg","scale":2}"#);
        assert_eq!(record.filename, "a");
        assert_eq!(record.rendition_type, "svg");
        assert_eq!(record.scale, 2);
    }

    #[test]
    fn test_decode_record_invalid_json_uses_defaults() {
        assert_eq!(decode_record("not valid json {{"), PreferenceRecord::default());
    }

    #[test]
    fn test_decode_record_bad_scale_keeps_other_fields() {
        let record = decode_record(r#"{"filename":"cover","renditionType":"jpg","scale":300}"#);
        assert_eq!(record.filename, "cover");
        assert_eq!(record.rendition_type, "jpg");
        assert_eq!(record.scale, 5);

        let record = decode_record(r#"{"filename":"cover","scale":-3}"#);
        assert_eq!(record.filename, "cover");
        assert_eq!(record.scale, 1);

        let record = decode_record(r#"{"filename":"cover","scale":"large","overwriteFile":true}"#);
        assert_eq!(record.filename, "cover");
        assert_eq!(record.scale, 1);
        assert!(record.overwrite_file);
    }

    #[test]
    fn test_decode_record_wrong_field_type_uses_defaults() {
        assert_eq!(
            decode_record(r#"{"filename": 42}"#),
            PreferenceRecord::default()
        );
    }

    #[test]
    fn test_normalize_for_save_clamps_scale() {
        let record = PreferenceRecord {
            scale: 0,
            ..Default::default()
        };
        assert_eq!(normalize_for_save(record).scale, 1);

        let valid = PreferenceRecord {
            scale: 4,
            ..Default::default()
        };
        assert_eq!(normalize_for_save(valid.clone()), valid);
    }
}
