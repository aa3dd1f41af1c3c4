//! In-process preference store.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{normalize_for_save, PreferenceStore, StorageError};
use crate::config::PreferenceRecord;

/// Keeps the record in memory. Used when no database is available and in tests.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    record: Mutex<Option<PreferenceRecord>>,
    saves: AtomicUsize,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a record already stored.
    pub fn with_record(record: PreferenceRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
            saves: AtomicUsize::new(0),
        }
    }

    /// The stored record, `None` if nothing has been saved.
    pub async fn stored(&self) -> Option<PreferenceRecord> {
        self.record.lock().await.clone()
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn load(&self) -> Result<PreferenceRecord, StorageError> {
        Ok(self.record.lock().await.clone().unwrap_or_default())
    }

    async fn save(&self, record: PreferenceRecord) -> Result<PreferenceRecord, StorageError> {
        let record = normalize_for_save(record);
        *self.record.lock().await = Some(record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(record)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.record.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_serves_defaults() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.load().await.unwrap(), PreferenceRecord::default());
        assert!(store.stored().await.is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_roundtrip_and_save_count() {
        let store = MemoryPreferenceStore::new();
        let record = PreferenceRecord {
            filename: "banner".to_string(),
            scale: 2,
            ..Default::default()
        };

        assert_eq!(store.save(record.clone()).await.unwrap(), record);
        assert_eq!(store.load().await.unwrap(), record);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = MemoryPreferenceStore::with_record(PreferenceRecord {
            overwrite_file: true,
            ..Default::default()
        });
        store.clear().await.unwrap();
        assert!(store.stored().await.is_none());
    }
}
