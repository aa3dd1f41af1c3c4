//! SQLite database layer for Renderdesk.
//!
//! Preferences live in a key/value `settings` table; each value is a JSON
//! document owned by one store.

mod migrations;

use rusqlite::Connection;
use std::path::PathBuf;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Open the database at the default location.
    ///
    /// Default path: `~/.local/share/renderdesk/renderdesk.db`
    pub fn open() -> anyhow::Result<Self> {
        let path = Self::default_path()?;
        Self::open_at(path)
    }

    /// Open the database at a specific path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open_at(path: PathBuf) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&path)?;
        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self { conn, path })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    /// Get the default database path.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".local/share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("renderdesk").join("renderdesk.db"))
    }

    /// Run database migrations.
    ///
    /// Safe to call multiple times - migrations are tracked and only run once.
    pub fn migrate(&self) -> anyhow::Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    // =========================================================================
    // Settings Storage
    // =========================================================================

    /// Save a setting (upsert).
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, unixepoch())
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at",
            [key, value],
        )?;
        Ok(())
    }

    /// Get a setting. Returns `None` if it doesn't exist.
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM settings WHERE key = ?")?;
        let result = stmt.query_row([key], |row| row.get(0));
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a setting. No-op if it doesn't exist.
    pub fn delete_setting(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?", [key])?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_db() -> (TempDir, Database) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Database::open_at(db_path).unwrap();
        db.migrate().unwrap();
        (temp_dir, db)
    }

    #[test]
    fn test_open_at_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let nested_path = tmp.path().join("deep").join("nested").join("test.db");

        assert!(!nested_path.parent().unwrap().exists());

        let _db = Database::open_at(nested_path.clone()).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_open_at_reuses_existing_database() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test.db");

        {
            let db = Database::open_at(path.clone()).unwrap();
            db.migrate().unwrap();
            db.set_setting("export_preferences", "{}").unwrap();
        }

        {
            let db = Database::open_at(path).unwrap();
            db.migrate().unwrap();
            let value = db.get_setting("export_preferences").unwrap();
            assert_eq!(value, Some("{}".to_string()));
        }
    }

    #[test]
    fn test_default_path_returns_valid_path() {
        if let Ok(path) = Database::default_path() {
            assert!(path.ends_with("renderdesk/renderdesk.db"));
        }
    }

    #[test]
    fn test_in_memory_database() {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db.set_setting("k", "v").unwrap();
        assert_eq!(db.get_setting("k").unwrap(), Some("v".to_string()));
        assert_eq!(db.path(), &PathBuf::from(":memory:"));
    }

    #[test]
    fn test_set_setting_upserts_existing() {
        let (_temp, db) = setup_test_db();

        db.set_setting("theme", "light").unwrap();
        db.set_setting("theme", "dark").unwrap();

        assert_eq!(db.get_setting("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_get_setting_returns_none_for_missing() {
        let (_temp, db) = setup_test_db();
        assert!(db.get_setting("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_delete_setting_removes_setting() {
        let (_temp, db) = setup_test_db();

        db.set_setting("theme", "dark").unwrap();
        db.delete_setting("theme").unwrap();
        assert!(db.get_setting("theme").unwrap().is_none());

        // Deleting again is fine
        db.delete_setting("theme").unwrap();
    }

    #[test]
    fn test_setting_without_migration_fails() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.set_setting("k", "v").is_err());
    }
}
