//! User-visible notices. Fire and forget: a notice can never fail the caller.

use crossterm::style::Stylize;
use std::io::Write;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Success,
  Info,
  Error,
}

pub trait Notifier {
  fn notify(&self, level: Level, message: &str);

  fn success(&self, message: &str) {
    self.notify(Level::Success, message);
  }

  fn info(&self, message: &str) {
    self.notify(Level::Info, message);
  }

  fn error(&self, message: &str) {
    self.notify(Level::Error, message);
  }
}

/// Prints one styled line per notice; errors go to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
  fn notify(&self, level: Level, message: &str) {
    match level {
      Level::Success => {
        info!(notice = message, "success");
        let _ = writeln!(std::io::stdout(), "{} {}", "✓".green(), message);
      }
      Level::Info => {
        info!(notice = message, "info");
        let _ = writeln!(std::io::stdout(), "{} {}", "•".cyan(), message);
      }
      Level::Error => {
        error!(notice = message, "error");
        let _ = writeln!(std::io::stderr(), "{} {}", "✗".red(), message.red());
      }
    }
  }
}
