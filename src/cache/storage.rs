//! Cache storage trait and SQLite implementation.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

use crate::error::{Error, Result};

/// Trait for cache storage backends.
///
/// A backend is a flat map from slot key to serialized value. Callers above
/// this trait decide what a failure means; backends just report it.
pub trait CacheStorage: Send + Sync {
  /// Get the raw value stored under a key.
  fn get(&self, key: &str) -> Result<Option<String>>;

  /// Store a raw value under a key, replacing any previous value.
  fn put(&self, key: &str, value: &str) -> Result<()>;

  /// Remove a key. Removing a missing key is not an error.
  fn remove(&self, key: &str) -> Result<()>;

  /// When the key was last written.
  fn written_at(&self, key: &str) -> Result<Option<DateTime<Utc>>>;
}

/// SQLite-based cache storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open or create the cache database at the given path.
  pub fn open(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    Self::with_connection(conn)
  }

  /// Open the cache at `path`, or a throwaway in-memory cache when that file
  /// cannot be used. The remote store keeps working either way.
  pub fn open_or_in_memory(path: &Path) -> Result<Self> {
    match Self::open(path) {
      Ok(storage) => Ok(storage),
      Err(e) => {
        warn!(path = %path.display(), error = %e, "Cache unusable, keeping it in memory");
        Self::open_in_memory()
      }
    }
  }

  /// Private in-memory database, gone when dropped.
  pub fn open_in_memory() -> Result<Self> {
    Self::with_connection(Connection::open_in_memory()?)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;
    Ok(storage)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;

    Ok(data_dir.join("team-todo").join("cache.db"))
  }

  /// Run database migrations for cache tables.
  fn run_migrations(&self) -> Result<()> {
    self.lock()?.execute_batch(CACHE_SCHEMA)?;
    Ok(())
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
    self
      .conn
      .lock()
      .map_err(|e| Error::Config(format!("Cache lock poisoned: {}", e)))
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
-- One row per slot, value is the JSON document for the slot
CREATE TABLE IF NOT EXISTS cache_slots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    written_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl CacheStorage for SqliteStorage {
  fn get(&self, key: &str) -> Result<Option<String>> {
    let conn = self.lock()?;
    let value = conn
      .query_row(
        "SELECT value FROM cache_slots WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;
    Ok(value)
  }

  fn put(&self, key: &str, value: &str) -> Result<()> {
    let conn = self.lock()?;
    conn.execute(
      "INSERT OR REPLACE INTO cache_slots (key, value, written_at)
       VALUES (?, ?, datetime('now'))",
      params![key, value],
    )?;
    Ok(())
  }

  fn remove(&self, key: &str) -> Result<()> {
    let conn = self.lock()?;
    conn.execute("DELETE FROM cache_slots WHERE key = ?", params![key])?;
    Ok(())
  }

  fn written_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
    let conn = self.lock()?;
    let raw: Option<String> = conn
      .query_row(
        "SELECT written_at FROM cache_slots WHERE key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;

    raw.as_deref().map(parse_datetime).transpose()
  }
}

/// Parse a datetime string from SQLite format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  // SQLite stores as "YYYY-MM-DD HH:MM:SS"
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|e| Error::Config(format!("Failed to parse datetime '{}': {}", s, e)))
}
