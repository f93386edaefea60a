use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{Error, Result};

/// Environment variable holding the log filter (e.g. `team_todo=debug`)
pub const LOG_ENV: &str = "TEAM_TODO_LOG";

/// Send log lines to `team-todo.log` in `dir`, never to the terminal.
///
/// The returned guard flushes the writer when dropped; keep it alive for the
/// life of the process.
pub fn setup(dir: &Path) -> Result<WorkerGuard> {
  std::fs::create_dir_all(dir)?;

  let appender = tracing_appender::rolling::never(dir, "team-todo.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
  let fmt_layer = fmt::layer()
    .with_writer(writer)
    .with_ansi(false)
    .with_target(true)
    .with_filter(env_filter);

  tracing_subscriber::registry()
    .with(fmt_layer)
    .try_init()
    .map_err(|e| Error::Config(format!("Failed to initialise logging: {}", e)))?;

  Ok(guard)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_dropping_guard_flushes_log_file() {
    let dir = tempfile::tempdir().unwrap();
    let guard = setup(dir.path()).unwrap();

    tracing::error!(notice = "Not signed in", "error");
    drop(guard);

    let written = std::fs::read_to_string(dir.path().join("team-todo.log")).unwrap();
    assert!(written.contains("Not signed in"));
  }
}
