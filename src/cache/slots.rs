//! Typed slots on top of a raw cache storage backend.
//!
//! Reads never fail: a missing key, a broken backend or a value that does
//! not parse all read as empty. Writes log and swallow failures.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::storage::CacheStorage;
use super::traits::Record;
use crate::models::User;

/// Named places in the cache, each stored under a fixed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
  Tasks,
  Users,
  Session,
}

impl Slot {
  pub fn key(self) -> &'static str {
    match self {
      Slot::Tasks => "team-todo-tasks",
      Slot::Users => "team-todo-users",
      Slot::Session => "auth_user",
    }
  }

  /// Older key whose value is adopted when the canonical key is absent.
  pub fn legacy_key(self) -> Option<&'static str> {
    match self {
      Slot::Users => Some("users_db"),
      _ => None,
    }
  }
}

/// Local cache store: typed, infallible access to the cache slots.
pub struct LocalCache<S: CacheStorage> {
  storage: Arc<S>,
}

impl<S: CacheStorage> LocalCache<S> {
  pub fn new(storage: S) -> Self {
    Self {
      storage: Arc::new(storage),
    }
  }

  /// Direct access to the backend.
  pub fn storage(&self) -> &S {
    &self.storage
  }

  /// Read the sequence held in `T`'s slot, in stored order.
  pub fn read_list<T: Record>(&self) -> Vec<T> {
    let slot = T::slot();
    match self.read_raw(slot) {
      Some(raw) => parse_or_empty(slot, &raw),
      None => Vec::new(),
    }
  }

  /// Replace the sequence held in `T`'s slot.
  pub fn write_list<T: Record>(&self, items: &[T]) {
    match serde_json::to_string(items) {
      Ok(raw) => self.write_raw(T::slot(), &raw),
      Err(e) => warn!(slot = T::slot().key(), error = %e, "Failed to serialize cache slot"),
    }
  }

  /// The persisted session user, if any.
  pub fn read_session(&self) -> Option<User> {
    let raw = self.read_raw(Slot::Session)?;
    match serde_json::from_str(&raw) {
      Ok(user) => user,
      Err(e) => {
        warn!(error = %e, "Ignoring malformed session slot");
        None
      }
    }
  }

  pub fn write_session(&self, user: &User) {
    match serde_json::to_string(user) {
      Ok(raw) => self.write_raw(Slot::Session, &raw),
      Err(e) => warn!(error = %e, "Failed to serialize session"),
    }
  }

  pub fn clear_session(&self) {
    if let Err(e) = self.storage.remove(Slot::Session.key()) {
      warn!(error = %e, "Failed to clear session slot");
    }
  }

  /// When a slot was last written, if it ever was.
  pub fn written_at(&self, slot: Slot) -> Option<DateTime<Utc>> {
    self
      .storage
      .written_at(slot.key())
      .unwrap_or_else(|e| {
        warn!(slot = slot.key(), error = %e, "Failed to read cache timestamp");
        None
      })
  }

  fn read_raw(&self, slot: Slot) -> Option<String> {
    match self.storage.get(slot.key()) {
      Ok(Some(raw)) => Some(raw),
      Ok(None) => self.migrate_legacy(slot),
      Err(e) => {
        warn!(slot = slot.key(), error = %e, "Failed to read cache slot");
        None
      }
    }
  }

  /// Adopt the legacy value for a slot and copy it under the canonical key.
  fn migrate_legacy(&self, slot: Slot) -> Option<String> {
    let legacy_key = slot.legacy_key()?;
    let raw = match self.storage.get(legacy_key) {
      Ok(value) => value?,
      Err(e) => {
        warn!(key = legacy_key, error = %e, "Failed to read legacy cache key");
        return None;
      }
    };

    // Only carry over values that parse, so a broken legacy value is not made canonical.
    if serde_json::from_str::<serde_json::Value>(&raw).is_err() {
      warn!(key = legacy_key, "Ignoring malformed legacy cache value");
      return None;
    }

    info!(from = legacy_key, to = slot.key(), "Migrating legacy cache key");
    self.write_raw(slot, &raw);
    Some(raw)
  }

  fn write_raw(&self, slot: Slot, raw: &str) {
    match self.storage.put(slot.key(), raw) {
      Ok(()) => debug!(slot = slot.key(), bytes = raw.len(), "Wrote cache slot"),
      Err(e) => warn!(slot = slot.key(), error = %e, "Failed to write cache slot"),
    }
  }
}

impl<S: CacheStorage> Clone for LocalCache<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
    }
  }
}

fn parse_or_empty<T: Record>(slot: Slot, raw: &str) -> Vec<T> {
  serde_json::from_str(raw).unwrap_or_else(|e| {
    warn!(slot = slot.key(), error = %e, "Ignoring malformed cache slot");
    Vec::new()
  })
}
