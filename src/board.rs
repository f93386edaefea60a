//! Task board: the page-level state behind every task command.
//!
//! The board keeps its own copy of the task list and patches it after each
//! successful operation, so callers can render without a second round trip.

use clap::ValueEnum;

use crate::cache::CacheStorage;
use crate::error::{Error, Result};
use crate::models::Task;
use crate::notify::Notifier;
use crate::remote::RemoteStore;
use crate::store::TodoStore;

/// Completion filter for the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusFilter {
  #[default]
  All,
  Completed,
  Pending,
}

impl StatusFilter {
  pub fn matches(self, task: &Task) -> bool {
    match self {
      StatusFilter::All => true,
      StatusFilter::Completed => task.completed,
      StatusFilter::Pending => !task.completed,
    }
  }
}

/// Case-insensitive search over "{author} {text}"
fn matches_query(task: &Task, query_lower: &str) -> bool {
  format!("{} {}", task.author, task.text)
    .to_lowercase()
    .contains(query_lower)
}

pub struct TaskBoard<'a, R: RemoteStore, S: CacheStorage, N: Notifier> {
  store: &'a TodoStore<R, S>,
  notifier: &'a N,
  tasks: Vec<Task>,
  filter: StatusFilter,
  query: String,
  offline: bool,
}

impl<'a, R: RemoteStore, S: CacheStorage, N: Notifier> TaskBoard<'a, R, S, N> {
  pub fn new(store: &'a TodoStore<R, S>, notifier: &'a N) -> Self {
    Self {
      store,
      notifier,
      tasks: Vec::new(),
      filter: StatusFilter::default(),
      query: String::new(),
      offline: false,
    }
  }

  /// Every task on the board, unfiltered.
  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  /// Whether the last load came from the local cache.
  pub fn is_offline(&self) -> bool {
    self.offline
  }

  pub fn set_filter(&mut self, filter: StatusFilter) {
    self.filter = filter;
  }

  pub fn set_query(&mut self, query: impl Into<String>) {
    self.query = query.into();
  }

  /// Tasks matching both the search text and the status filter.
  pub fn visible(&self) -> Vec<&Task> {
    let query = self.query.to_lowercase();
    self
      .tasks
      .iter()
      .filter(|t| matches_query(t, &query) && self.filter.matches(t))
      .collect()
  }

  /// Replace the board list with the stored tasks.
  pub async fn load(&mut self) -> Result<()> {
    match self.store.list::<Task>().await {
      Ok(result) => {
        self.offline = result.is_offline();
        self.tasks = result.data;
        Ok(())
      }
      Err(e) => Err(self.report("Failed to load tasks", e)),
    }
  }

  pub async fn add(&mut self, author: &str, text: &str) -> Result<Task> {
    match self.store.create(Task::new(author, text)).await {
      Ok(created) => {
        self.tasks.insert(0, created.data.clone());
        self.notifier.success("Task created");
        Ok(created.data)
      }
      Err(e) => Err(self.report("Failed to create task", e)),
    }
  }

  pub async fn toggle(&mut self, id: &str, completed: bool) -> Result<Task> {
    let result = match self.find(id) {
      Some(current) => {
        let changed = Task {
          completed,
          ..current.clone()
        };
        self.store.update(id, changed).await
      }
      None => Err(Error::not_found("task", id)),
    };

    match result {
      Ok(updated) => {
        self.replace(id, updated.data.clone());
        Ok(updated.data)
      }
      Err(e) => Err(self.report("Failed to update task", e)),
    }
  }

  pub async fn edit(&mut self, id: &str, text: &str, editor: &str) -> Result<Task> {
    let Some(current) = self.find(id) else {
      let err = Error::not_found("task", id);
      self.notifier.error(&err.to_string());
      return Err(err);
    };

    let changed = Task {
      text: text.to_string(),
      editor: Some(editor.to_string()),
      ..current.clone()
    };

    match self.store.update(id, changed).await {
      Ok(updated) => {
        self.replace(id, updated.data.clone());
        self.notifier.success("Task edited");
        Ok(updated.data)
      }
      Err(e) => Err(self.report("Failed to edit task", e)),
    }
  }

  pub async fn remove(&mut self, id: &str) -> Result<()> {
    match self.store.delete::<Task>(id).await {
      Ok(_) => {
        self.tasks.retain(|t| t.id != id);
        self.notifier.info("Task deleted");
        Ok(())
      }
      Err(e) => Err(self.report("Failed to delete task", e)),
    }
  }

  fn find(&self, id: &str) -> Option<&Task> {
    self.tasks.iter().find(|t| t.id == id)
  }

  fn replace(&mut self, id: &str, task: Task) {
    if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
      *slot = task;
    }
  }

  fn report(&self, context: &str, e: Error) -> Error {
    self.notifier.error(&format!("{}: {}", context, e));
    e
  }
}
