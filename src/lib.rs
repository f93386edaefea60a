//! Shared to-do list backed by a remote collection store, with a local
//! SQLite cache that takes over whenever the remote cannot be reached.

pub mod board;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod remote;
pub mod render;
pub mod session;
pub mod store;

pub use error::{Error, Result};
