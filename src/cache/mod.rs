//! Local cache store for offline support.
//!
//! This module provides the persisted fallback side of the data-access layer:
//! - Raw key-value storage backends (SQLite, in-memory SQLite for tests)
//! - Typed slots for tasks, users and the session, with a legacy key migration
//! - The fallback-mode versions of create/update/delete that run on a slot alone

mod layer;
mod slots;
mod storage;
mod traits;

pub use slots::{LocalCache, Slot};
pub use storage::{CacheStorage, SqliteStorage};
pub use traits::{CacheResult, CacheSource, Record};

#[cfg(test)]
pub(crate) use slots::tests::BrokenStorage;
