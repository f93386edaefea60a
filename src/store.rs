//! Data-access layer: remote store first, local cache as the fallback.
//!
//! Every operation is a two-strategy composite. The write-through strategy
//! talks to the remote store and, after a mutation, re-fetches the whole
//! collection into the cache slot. When any step of it fails, the fallback
//! strategy runs the same operation against the cache slot alone.

use std::future::Future;
use tracing::{debug, warn};

use crate::cache::{CacheResult, CacheStorage, LocalCache, Record};
use crate::error::{Error, Result};
use crate::models::User;
use crate::remote::RemoteStore;

/// Remote-backed entity store with transparent offline fallback.
///
/// Transport failures never leave this type; only logical failures such as
/// [`Error::EntityNotFound`] do.
pub struct TodoStore<R: RemoteStore, S: CacheStorage> {
  remote: R,
  cache: LocalCache<S>,
}

impl<R: RemoteStore, S: CacheStorage> TodoStore<R, S> {
  pub fn new(remote: R, cache: LocalCache<S>) -> Self {
    Self { remote, cache }
  }

  pub fn cache(&self) -> &LocalCache<S> {
    &self.cache
  }

  /// The full collection.
  pub async fn list<T: Record>(&self) -> Result<CacheResult<Vec<T>>> {
    self
      .with_fallback::<T, _, _>("list", self.refresh::<T>(), || {
        Ok(self.cache.read_list::<T>())
      })
      .await
  }

  /// Store a new entity; the result carries the id the store assigned.
  pub async fn create<T: Record>(&self, entity: T) -> Result<CacheResult<T>> {
    let body = entity.clone();
    let remote = async move {
      let created = self.remote.create(&body).await?;
      self.refresh::<T>().await?;
      Ok::<_, Error>(created)
    };

    self
      .with_fallback::<T, _, _>("create", remote, || Ok(self.cache.create_offline(entity)))
      .await
  }

  /// Replace the entity at `id`.
  pub async fn update<T: Record>(&self, id: &str, entity: T) -> Result<CacheResult<T>> {
    let body = entity.clone();
    let remote = async move {
      let updated = self.remote.update(id, &body).await?;
      self.refresh::<T>().await?;
      Ok::<_, Error>(updated)
    };

    self
      .with_fallback::<T, _, _>("update", remote, || self.cache.update_offline(id, entity))
      .await
  }

  /// Remove the entity at `id`. Removing a missing entity succeeds.
  pub async fn delete<T: Record>(&self, id: &str) -> Result<CacheResult<()>> {
    let remote = async move {
      self.remote.delete::<T>(id).await?;
      self.refresh::<T>().await?;
      Ok::<_, Error>(())
    };

    self
      .with_fallback::<T, _, _>("delete", remote, || {
        self.cache.delete_offline::<T>(id);
        Ok(())
      })
      .await
  }

  /// Look a user up by trimmed name.
  ///
  /// The remote-backed list is searched first; the raw cache slot is searched
  /// independently afterwards, so a user created offline is still found once
  /// the remote answers again.
  pub async fn find_user_by_name(&self, name: &str) -> Result<Option<User>> {
    let name = name.trim();

    let listed = self.list::<User>().await?;
    if let Some(user) = listed.data.into_iter().find(|u| u.has_name(name)) {
      debug!(name, "Found user in listed users");
      return Ok(Some(user));
    }

    let cached = self
      .cache
      .read_list::<User>()
      .into_iter()
      .find(|u| u.has_name(name));
    if cached.is_some() {
      debug!(name, "Found user in local cache");
    }
    Ok(cached)
  }

  /// Fetch the remote collection and mirror it into the cache slot.
  async fn refresh<T: Record>(&self) -> Result<Vec<T>> {
    let items = self.remote.list::<T>().await?;
    self.cache.write_list(&items);
    Ok(items)
  }

  /// Run the remote strategy; on a transport failure run the local one instead.
  async fn with_fallback<T, V, Fut>(
    &self,
    op: &'static str,
    remote: Fut,
    local: impl FnOnce() -> Result<V>,
  ) -> Result<CacheResult<V>>
  where
    T: Record,
    Fut: Future<Output = Result<V>>,
  {
    match remote.await {
      Ok(data) => Ok(CacheResult::from_network(data)),
      Err(e) if e.is_transport() => {
        if matches!(e, Error::Offline) {
          debug!(op, kind = T::kind(), "Remote store offline, using local cache");
        } else {
          warn!(op, kind = T::kind(), error = %e, "Remote store failed, using local cache");
        }
        local().map(CacheResult::offline)
      }
      Err(e) => Err(e),
    }
  }
}
