//! In-memory remote store for tests, with an online switch.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use super::RemoteStore;
use crate::cache::Record;
use crate::error::{Error, Result};

pub struct MemoryRemote {
  collections: Mutex<HashMap<&'static str, Vec<Value>>>,
  online: AtomicBool,
  fail_lists: AtomicBool,
  next_id: AtomicU64,
  requests: AtomicU64,
}

impl MemoryRemote {
  pub fn new() -> Self {
    Self {
      collections: Mutex::new(HashMap::new()),
      online: AtomicBool::new(true),
      fail_lists: AtomicBool::new(false),
      next_id: AtomicU64::new(1),
      requests: AtomicU64::new(0),
    }
  }

  pub fn set_online(&self, online: bool) {
    self.online.store(online, Ordering::SeqCst);
  }

  /// Make collection GETs fail with a 500 while mutations keep working.
  pub fn set_fail_lists(&self, fail: bool) {
    self.fail_lists.store(fail, Ordering::SeqCst);
  }

  /// Put entities straight into a collection, bypassing the request counter.
  pub fn seed<T: Record>(&self, items: &[T]) {
    let values = items
      .iter()
      .map(|item| serde_json::to_value(item).unwrap())
      .collect();
    self
      .collections
      .lock()
      .unwrap()
      .insert(T::collection(), values);

    // Keep assigned ids clear of numeric seeded ones
    let highest = items
      .iter()
      .filter_map(|item| item.id().parse::<u64>().ok())
      .max()
      .unwrap_or(0);
    self.next_id.fetch_max(highest + 1, Ordering::SeqCst);
  }

  pub fn contents<T: Record>(&self) -> Vec<T> {
    let collections = self.collections.lock().unwrap();
    collections
      .get(T::collection())
      .map(|values| {
        values
          .iter()
          .map(|v| serde_json::from_value(v.clone()).unwrap())
          .collect()
      })
      .unwrap_or_default()
  }

  /// Number of requests answered or refused so far.
  pub fn requests(&self) -> u64 {
    self.requests.load(Ordering::SeqCst)
  }

  fn check_online(&self) -> Result<()> {
    self.requests.fetch_add(1, Ordering::SeqCst);
    if self.online.load(Ordering::SeqCst) {
      Ok(())
    } else {
      Err(Error::Offline)
    }
  }
}

fn id_of(value: &Value) -> Option<&str> {
  value.get("id").and_then(Value::as_str)
}

impl RemoteStore for MemoryRemote {
  async fn list<T: Record>(&self) -> Result<Vec<T>> {
    self.check_online()?;
    if self.fail_lists.load(Ordering::SeqCst) {
      return Err(Error::Status(500));
    }
    let collections = self.collections.lock().unwrap();
    let values = collections.get(T::collection()).cloned().unwrap_or_default();
    values
      .into_iter()
      .map(|v| serde_json::from_value(v).map_err(Error::from))
      .collect()
  }

  async fn create<T: Record>(&self, entity: &T) -> Result<T> {
    self.check_online()?;
    let mut created = entity.clone();
    created.set_id(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());

    let value = serde_json::to_value(&created)?;
    self
      .collections
      .lock()
      .unwrap()
      .entry(T::collection())
      .or_default()
      .push(value);
    Ok(created)
  }

  async fn update<T: Record>(&self, id: &str, entity: &T) -> Result<T> {
    self.check_online()?;
    let mut collections = self.collections.lock().unwrap();
    let values = collections.entry(T::collection()).or_default();
    let target = values
      .iter_mut()
      .find(|v| id_of(v) == Some(id))
      .ok_or(Error::Status(404))?;

    let mut updated = entity.clone();
    updated.set_id(id.to_string());
    *target = serde_json::to_value(&updated)?;
    Ok(updated)
  }

  async fn delete<T: Record>(&self, id: &str) -> Result<()> {
    self.check_online()?;
    let mut collections = self.collections.lock().unwrap();
    let values = collections.entry(T::collection()).or_default();
    let before = values.len();
    values.retain(|v| id_of(v) != Some(id));
    if values.len() == before {
      return Err(Error::Status(404));
    }
    Ok(())
  }
}
