//! Error types for team-todo.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  /// The remote store could not be reached or sent a body that did not decode.
  #[error("Remote request failed: {0}")]
  Transport(#[from] reqwest::Error),

  /// Non-2xx answer from the remote store.
  #[error("Remote store answered {0}")]
  Status(u16),

  /// The remote store is switched off (`--offline`).
  #[error("Remote store is offline")]
  Offline,

  #[error("Invalid remote URL: {0}")]
  Url(#[from] url::ParseError),

  #[error("{kind} {id} not found")]
  EntityNotFound { kind: &'static str, id: String },

  #[error("Wrong password for {0}")]
  InvalidCredentials(String),

  #[error("Not signed in. Run `team-todo login <name> <password>` first.")]
  NotSignedIn,

  #[error("Cache storage error: {0}")]
  Storage(#[from] rusqlite::Error),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  /// Failures the data-access layer absorbs by falling back to the cache.
  pub fn is_transport(&self) -> bool {
    matches!(self, Error::Transport(_) | Error::Status(_) | Error::Offline | Error::Url(_))
  }

  pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
    Error::EntityNotFound {
      kind,
      id: id.into(),
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
