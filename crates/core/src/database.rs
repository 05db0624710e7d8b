use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{named_params, Connection, OptionalExtension};

use crate::config::AppConfig;
use crate::store::KeyValueStore;

const SCHEMA_VERSION: i64 = 1;

/// SQLite-backed key-value store holding the serialized task list and theme.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn initialize(config: &AppConfig) -> Result<Self> {
        let conn = Connection::open(config.db_path()).with_context(|| {
            format!("Failed to open database at {}", config.db_path().display())
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to configure SQLite WAL mode")?;

        let db = Self { conn };
        db.apply_migrations()?;
        tracing::debug!(path = %config.db_path().display(), "opened task database");
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    fn apply_migrations(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .context("Failed to read schema version")?;
        if version >= SCHEMA_VERSION {
            return Ok(());
        }

        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS kv_store (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                 );
                 PRAGMA user_version = 1;",
            )
            .context("Failed to apply schema migrations")?;
        tracing::info!(version = SCHEMA_VERSION, "applied database migrations");
        Ok(())
    }
}

impl KeyValueStore for Database {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = :key LIMIT 1",
                named_params![":key": key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("Failed to read key '{}'", key))?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        let updated = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (:key, :value, :updated)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                named_params![
                    ":key": key,
                    ":value": value,
                    ":updated": updated,
                ],
            )
            .with_context(|| format!("Failed to write key '{}'", key))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Task, Theme};
    use crate::store::{TaskStore, TASKS_KEY, THEME_KEY};
    use tempfile::TempDir;

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        (config, dir)
    }

    #[test]
    fn set_item_overwrites_existing_value() {
        let mut db = Database::open_in_memory().expect("open db");
        assert_eq!(db.get_item("theme").unwrap(), None);

        db.set_item("theme", "light-mode").unwrap();
        db.set_item("theme", "dark-mode").unwrap();

        assert_eq!(db.get_item("theme").unwrap().as_deref(), Some("dark-mode"));
        let rows: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn values_survive_reopening_the_file() {
        let (config, _dir) = temp_config();
        let task = Task {
            id: "01HQ".into(),
            title: "Renew passport".into(),
            description: String::new(),
            due_date: None,
            priority: Priority::High,
            completed: false,
            created_at: Utc::now(),
        };

        {
            let db = Database::initialize(&config).expect("initialize db");
            let mut store = TaskStore::new(db);
            store.save_tasks(std::slice::from_ref(&task));
            store.save_theme(Theme::Dark);
        }

        let db = Database::initialize(&config).expect("reopen db");
        assert!(db.get_item(TASKS_KEY).unwrap().is_some());
        assert_eq!(db.get_item(THEME_KEY).unwrap().as_deref(), Some("dark-mode"));

        let store = TaskStore::new(db);
        assert_eq!(store.get_tasks(), vec![task]);
        assert_eq!(store.get_theme(), Theme::Dark);
    }
}
