//! Fallback-mode entity operations that run against a cache slot alone.
//!
//! These are the second strategy of the data-access layer: they are used when
//! the remote store fails, and fill in what the remote would have assigned.

use tracing::debug;

use super::slots::LocalCache;
use super::storage::CacheStorage;
use super::traits::Record;
use crate::error::{Error, Result};
use crate::models::synthesize_id;

impl<S: CacheStorage> LocalCache<S> {
  /// Append an entity to its slot under a freshly synthesized id.
  pub fn create_offline<T: Record>(&self, mut entity: T) -> T {
    entity.set_id(synthesize_id());

    let mut items = self.read_list::<T>();
    items.push(entity.clone());
    self.write_list(&items);

    debug!(kind = T::kind(), id = entity.id(), "Created entity in local cache");
    entity
  }

  /// Replace the entity with the given id in place.
  ///
  /// The stored replacement always carries `id`, whatever id `entity` had.
  pub fn update_offline<T: Record>(&self, id: &str, mut entity: T) -> Result<T> {
    let mut items = self.read_list::<T>();
    let target = items
      .iter_mut()
      .find(|item| item.id() == id)
      .ok_or_else(|| Error::not_found(T::kind(), id))?;

    entity.set_id(id.to_string());
    *target = entity.clone();
    self.write_list(&items);

    debug!(kind = T::kind(), id, "Updated entity in local cache");
    Ok(entity)
  }

  /// Drop every entity with the given id. Missing ids are fine.
  pub fn delete_offline<T: Record>(&self, id: &str) {
    let items = self.read_list::<T>();
    let before = items.len();
    let kept: Vec<T> = items.into_iter().filter(|item| item.id() != id).collect();

    debug!(
      kind = T::kind(),
      id,
      removed = before - kept.len(),
      "Deleted entity from local cache"
    );
    self.write_list(&kept);
  }
}
