//! Core traits and types for the caching system.

use serde::{de::DeserializeOwned, Serialize};

use super::slots::Slot;

/// Trait for entities kept in a remote collection and mirrored into a cache slot.
///
/// Implementors expose their identifier and say where they live: the remote
/// collection path segment and the local slot.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Identifier assigned by the remote store, or synthesized offline.
  /// Empty for entities that have not been created yet.
  fn id(&self) -> &str;

  fn set_id(&mut self, id: String);

  /// Entity type name used in logs and errors (e.g., "task")
  fn kind() -> &'static str;

  /// Remote collection path segment (e.g., "tasks")
  fn collection() -> &'static str;

  /// Local cache slot holding the mirrored collection
  fn slot() -> Slot;
}

/// Result from a data-access operation, including where the data came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
}

impl<T> CacheResult<T> {
  /// Create a new result from the remote store (cache already written through).
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
    }
  }

  /// Create a new result for fallback mode.
  pub fn offline(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Offline,
    }
  }

  pub fn is_offline(&self) -> bool {
    self.source == CacheSource::Offline
  }
}

/// Indicates where data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Remote store answered; the cache slot mirrors it
  Network,
  /// Remote store failed; the operation ran against the cache slot only
  Offline,
}
