//! SQLite-backed preference store.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{decode_record, normalize_for_save, PreferenceStore, StorageError, PREFERENCES_KEY};
use crate::config::PreferenceRecord;
use crate::db::Database;

/// Stores the record as JSON in the `settings` table.
///
/// All access goes through one mutex, so a `load` that starts after a `save`
/// resolved always sees the saved value.
#[derive(Debug)]
pub struct SqlitePreferenceStore {
    db: Mutex<Database>,
}

impl SqlitePreferenceStore {
    /// Wrap an already opened database, running migrations first.
    pub fn from_database(db: Database) -> Result<Self, StorageError> {
        db.migrate().map_err(|e| StorageError::Open(e.to_string()))?;
        Ok(Self { db: Mutex::new(db) })
    }

    /// Open (or create) the store at a specific path.
    pub fn open_at(path: PathBuf) -> Result<Self, StorageError> {
        let db = Database::open_at(path).map_err(|e| StorageError::Open(e.to_string()))?;
        Self::from_database(db)
    }

    /// Open the store at the default data-directory location.
    pub fn open_default() -> Result<Self, StorageError> {
        let db = Database::open().map_err(|e| StorageError::Open(e.to_string()))?;
        Self::from_database(db)
    }

    /// Store that lives only as long as this process.
    pub fn in_memory() -> Result<Self, StorageError> {
        let db = Database::open_in_memory().map_err(|e| StorageError::Open(e.to_string()))?;
        Self::from_database(db)
    }

    /// Whether a record has been written (as opposed to defaults being served).
    pub async fn has_record(&self) -> Result<bool, StorageError> {
        let db = self.db.lock().await;
        Ok(db.get_setting(PREFERENCES_KEY)?.is_some())
    }
}

#[async_trait]
impl PreferenceStore for SqlitePreferenceStore {
    async fn load(&self) -> Result<PreferenceRecord, StorageError> {
        let db = self.db.lock().await;
        let record = match db.get_setting(PREFERENCES_KEY)? {
            Some(json) => decode_record(&json),
            None => {
                tracing::debug!("No stored preferences, using defaults");
                PreferenceRecord::default()
            }
        };
        Ok(record)
    }

    async fn save(&self, record: PreferenceRecord) -> Result<PreferenceRecord, StorageError> {
        let record = normalize_for_save(record);
        let json = serde_json::to_string(&record)?;

        let db = self.db.lock().await;
        db.set_setting(PREFERENCES_KEY, &json)?;
        tracing::debug!(?record, "Saved preferences");
        Ok(record)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let db = self.db.lock().await;
        db.delete_setting(PREFERENCES_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> PreferenceRecord {
        PreferenceRecord {
            filename: "landing-hero".to_string(),
            rendition_type: "jpg".to_string(),
            scale: 3,
            overwrite_file: true,
            skip_no_folder_message: false,
        }
    }

    #[tokio::test]
    async fn test_load_returns_defaults_when_missing() {
        let store = SqlitePreferenceStore::in_memory().unwrap();
        assert_eq!(store.load().await.unwrap(), PreferenceRecord::default());
        assert!(!store.has_record().await.unwrap());
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() {
        let store = SqlitePreferenceStore::in_memory().unwrap();

        let saved = store.save(sample()).await.unwrap();
        assert_eq!(saved, sample());
        assert_eq!(store.load().await.unwrap(), sample());
        assert!(store.has_record().await.unwrap());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_record() {
        let store = SqlitePreferenceStore::in_memory().unwrap();

        store.save(sample()).await.unwrap();
        let second = PreferenceRecord {
            filename: "icon".to_string(),
            ..Default::default()
        };
        store.save(second.clone()).await.unwrap();

        assert_eq!(store.load().await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_save_clamps_out_of_range_scale() {
        let store = SqlitePreferenceStore::in_memory().unwrap();
        let saved = store
            .save(PreferenceRecord {
                scale: 12,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(saved.scale, 5);
        assert_eq!(store.load().await.unwrap().scale, 5);
    }

    #[tokio::test]
    async fn test_clear_restores_defaults() {
        let store = SqlitePreferenceStore::in_memory().unwrap();
        store.save(sample()).await.unwrap();

        store.clear().await.unwrap();

        assert_eq!(store.load().await.unwrap(), PreferenceRecord::default());
        assert!(!store.has_record().await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_record_loads_defaults() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db.set_setting(PREFERENCES_KEY, "not valid json {{").unwrap();
        let store = SqlitePreferenceStore::from_database(db).unwrap();

        assert_eq!(store.load().await.unwrap(), PreferenceRecord::default());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.db");

        {
            let store = SqlitePreferenceStore::open_at(path.clone()).unwrap();
            store.save(sample()).await.unwrap();
        }

        let store = SqlitePreferenceStore::open_at(path).unwrap();
        assert_eq!(store.load().await.unwrap(), sample());
    }
}
