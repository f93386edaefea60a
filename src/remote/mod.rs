//! Remote store clients.

mod client;
#[cfg(test)]
pub(crate) mod fake;

use std::future::Future;

use crate::cache::Record;
use crate::error::{Error, Result};

pub use client::HttpRemote;

/// A network collection store with REST semantics.
///
/// Every method is one request; a failed request is an error of the
/// transport class (see [`Error::is_transport`]).
pub trait RemoteStore: Send + Sync {
  /// GET the full collection.
  fn list<T: Record>(&self) -> impl Future<Output = Result<Vec<T>>> + Send;

  /// POST a new entity, returning it as the store assigned it.
  fn create<T: Record>(&self, entity: &T) -> impl Future<Output = Result<T>> + Send;

  /// PUT the entity at `id`, returning the store's response.
  fn update<T: Record>(&self, id: &str, entity: &T) -> impl Future<Output = Result<T>> + Send;

  /// DELETE the entity at `id`.
  fn delete<T: Record>(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Remote store that is never reachable. Every operation runs in fallback mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineRemote;

impl RemoteStore for OfflineRemote {
  async fn list<T: Record>(&self) -> Result<Vec<T>> {
    Err(Error::Offline)
  }

  async fn create<T: Record>(&self, _entity: &T) -> Result<T> {
    Err(Error::Offline)
  }

  async fn update<T: Record>(&self, _id: &str, _entity: &T) -> Result<T> {
    Err(Error::Offline)
  }

  async fn delete<T: Record>(&self, _id: &str) -> Result<()> {
    Err(Error::Offline)
  }
}

/// Either the configured HTTP store or nothing at all (`--offline`).
#[derive(Clone)]
pub enum Remote {
  Http(HttpRemote),
  Offline(OfflineRemote),
}

impl RemoteStore for Remote {
  async fn list<T: Record>(&self) -> Result<Vec<T>> {
    match self {
      Remote::Http(r) => r.list().await,
      Remote::Offline(r) => r.list().await,
    }
  }

  async fn create<T: Record>(&self, entity: &T) -> Result<T> {
    match self {
      Remote::Http(r) => r.create(entity).await,
      Remote::Offline(r) => r.create(entity).await,
    }
  }

  async fn update<T: Record>(&self, id: &str, entity: &T) -> Result<T> {
    match self {
      Remote::Http(r) => r.update(id, entity).await,
      Remote::Offline(r) => r.update(id, entity).await,
    }
  }

  async fn delete<T: Record>(&self, id: &str) -> Result<()> {
    match self {
      Remote::Http(r) => r.delete::<T>(id).await,
      Remote::Offline(r) => r.delete::<T>(id).await,
    }
  }
}
