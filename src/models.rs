use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::cache::{Record, Slot};

/// A shared to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
  #[serde(
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "String::is_empty"
  )]
  pub id: String,
  #[serde(default)]
  pub author: String,
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub completed: bool,
  /// Name of the last user who edited the text
  #[serde(default)]
  pub editor: Option<String>,
}

impl Task {
  /// A pending task that has not been stored yet
  pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
    Self {
      id: String::new(),
      author: author.into(),
      text: text.into(),
      completed: false,
      editor: None,
    }
  }
}

/// An account. The password is kept and compared as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  #[serde(
    default,
    deserialize_with = "deserialize_id",
    skip_serializing_if = "String::is_empty"
  )]
  pub id: String,
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub password: String,
}

impl User {
  pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
    Self {
      id: String::new(),
      name: name.into(),
      password: password.into(),
    }
  }

  /// Login key comparison: both sides trimmed, unnamed records never match.
  pub fn has_name(&self, name: &str) -> bool {
    let own = self.name.trim();
    !own.is_empty() && own == name.trim()
  }
}

impl Record for Task {
  fn id(&self) -> &str {
    &self.id
  }

  fn set_id(&mut self, id: String) {
    self.id = id;
  }

  fn kind() -> &'static str {
    "task"
  }

  fn collection() -> &'static str {
    "tasks"
  }

  fn slot() -> Slot {
    Slot::Tasks
  }
}

impl Record for User {
  fn id(&self) -> &str {
    &self.id
  }

  fn set_id(&mut self, id: String) {
    self.id = id;
  }

  fn kind() -> &'static str {
    "user"
  }

  fn collection() -> &'static str {
    "users"
  }

  fn slot() -> Slot {
    Slot::Users
  }
}

/// Identifier for an entity created while the remote store is unreachable.
///
/// UUIDv7 keeps the creation-time ordering of the ids the remote never saw.
pub fn synthesize_id() -> String {
  Uuid::now_v7().simple().to_string()
}

/// Accepts string or numeric ids (json-server hands out both) and null.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
  }

  let raw: Option<RawId> = Option::deserialize(deserializer)?;
  Ok(match raw {
    Some(RawId::Text(s)) => s,
    Some(RawId::Unsigned(n)) => n.to_string(),
    Some(RawId::Signed(n)) => n.to_string(),
    None => String::new(),
  })
}
