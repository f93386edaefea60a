//! Plain-text rendering of tasks for the command line.

use chrono::{DateTime, Local, Utc};
use crossterm::style::Stylize;

use crate::models::Task;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Checkbox marker for a task's completion state
pub fn checkbox(completed: bool) -> &'static str {
  if completed {
    "[x]"
  } else {
    "[ ]"
  }
}

/// One unstyled line per task: marker, id, text, and who wrote/edited it.
pub fn task_line(task: &Task, text_width: usize) -> String {
  let mut line = format!(
    "{} {:<12} {:<width$}  by {}",
    checkbox(task.completed),
    truncate(&task.id, 12),
    truncate(&task.text, text_width),
    task.author,
    width = text_width,
  );
  if let Some(editor) = task.editor.as_deref().filter(|e| *e != task.author) {
    line.push_str(&format!(" (edited by {})", editor));
  }
  line
}

/// Styled variant of [`task_line`]: completed tasks are dimmed.
pub fn styled_task_line(task: &Task, text_width: usize) -> String {
  let line = task_line(task, text_width);
  if task.completed {
    line.dim().to_string()
  } else {
    line
  }
}

/// Banner shown when a listing comes from the local cache.
pub fn offline_banner(written_at: Option<DateTime<Utc>>) -> String {
  match written_at {
    Some(at) => format!(
      "Remote store unreachable, showing tasks cached at {}",
      at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
    ),
    None => "Remote store unreachable and nothing cached yet".to_string(),
  }
}
