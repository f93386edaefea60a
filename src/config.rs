use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::SqliteStorage;
use crate::error::{Error, Result};

/// Default remote store, a json-server style collection endpoint.
pub const DEFAULT_REMOTE_URL: &str = "http://localhost:4001";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub remote: RemoteConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
  /// Base URL of the collection endpoint (serves /tasks and /users)
  #[serde(default = "default_remote_url")]
  pub url: String,
  /// Request timeout in seconds. Unset means wait for the transport to give up.
  pub timeout_secs: Option<u64>,
}

impl Default for RemoteConfig {
  fn default() -> Self {
    Self {
      url: default_remote_url(),
      timeout_secs: None,
    }
  }
}

fn default_remote_url() -> String {
  DEFAULT_REMOTE_URL.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  /// Cache database file (default: $XDG_DATA_HOME/team-todo/cache.db)
  pub path: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./team-todo.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/team-todo/config.yaml
  ///
  /// With no file found the defaults are used. `TEAM_TODO_URL` overrides the
  /// remote URL in every case.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(Error::Config(format!(
          "Config file not found: {}",
          p.display()
        )));
      }
    } else {
      Self::find_config_file()
    };

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    Ok(config.with_env_overrides())
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("team-todo.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("team-todo").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
      Error::Config(format!(
        "Failed to read config file {}: {}",
        path.display(),
        e
      ))
    })?;

    Self::parse(&contents).map_err(|e| {
      Error::Config(format!(
        "Failed to parse config file {}: {}",
        path.display(),
        e
      ))
    })
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty file is a valid config with every default
    if contents.trim().is_empty() {
      return Ok(Config::default());
    }
    serde_yaml::from_str(contents)
  }

  fn with_env_overrides(mut self) -> Self {
    if let Ok(url) = std::env::var("TEAM_TODO_URL") {
      if !url.trim().is_empty() {
        self.remote.url = url;
      }
    }
    self
  }

  /// Where the cache database lives.
  pub fn cache_path(&self) -> Result<PathBuf> {
    match &self.cache.path {
      Some(p) => Ok(p.clone()),
      None => SqliteStorage::default_path(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.remote.url, DEFAULT_REMOTE_URL);
    assert_eq!(config.remote.timeout_secs, None);
    assert!(config.cache.path.is_none());
  }

  #[test]
  fn test_parse_partial_file() {
    let config = Config::parse("remote:\n  timeout_secs: 5\n").unwrap();
    assert_eq!(config.remote.url, DEFAULT_REMOTE_URL);
    assert_eq!(config.remote.timeout_secs, Some(5));
  }

  #[test]
  fn test_parse_empty_file() {
    let config = Config::parse("\n").unwrap();
    assert_eq!(config.remote.url, DEFAULT_REMOTE_URL);
  }

  #[test]
  fn test_load_explicit_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
      file,
      "remote:\n  url: http://todo.internal:8080/api\ncache:\n  path: /tmp/todo-cache.db"
    )
    .unwrap();

    let config = Config::load_from_path(file.path()).unwrap();

    assert_eq!(config.remote.url, "http://todo.internal:8080/api");
    assert_eq!(config.cache_path().unwrap(), PathBuf::from("/tmp/todo-cache.db"));
  }

  #[test]
  fn test_load_missing_explicit_file() {
    let err = Config::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_load_malformed_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "remote: [unterminated").unwrap();

    let err = Config::load_from_path(file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
  }
}
