//! Session and identity: who is signed in on this machine.
//!
//! Passwords are stored and compared as plain text, exactly as the shared
//! user collection holds them. There is no hashing anywhere in this path.

use tracing::info;

use crate::cache::{CacheStorage, LocalCache};
use crate::error::{Error, Result};
use crate::models::User;
use crate::remote::RemoteStore;
use crate::store::TodoStore;

/// Either nobody or exactly one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
  #[default]
  Anonymous,
  Authenticated(User),
}

/// How a successful login came about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
  /// Existing user, password matched
  SignedIn(User),
  /// Unknown name, a new user was created with the given password
  Registered(User),
}

impl LoginOutcome {
  pub fn user(&self) -> &User {
    match self {
      LoginOutcome::SignedIn(user) | LoginOutcome::Registered(user) => user,
    }
  }
}

/// Owns the current user and keeps the session slot in step with it.
#[derive(Debug, Default)]
pub struct Session {
  state: SessionState,
}

impl Session {
  /// Rehydrate from the session slot. Absent or malformed data means anonymous.
  pub fn restore<S: CacheStorage>(cache: &LocalCache<S>) -> Self {
    let state = match cache.read_session() {
      Some(user) => SessionState::Authenticated(user),
      None => SessionState::Anonymous,
    };
    Self { state }
  }

  pub fn state(&self) -> &SessionState {
    &self.state
  }

  pub fn current_user(&self) -> Option<&User> {
    match &self.state {
      SessionState::Authenticated(user) => Some(user),
      SessionState::Anonymous => None,
    }
  }

  /// The current user, or [`Error::NotSignedIn`].
  pub fn require_user(&self) -> Result<&User> {
    self.current_user().ok_or(Error::NotSignedIn)
  }

  pub fn is_authenticated(&self) -> bool {
    self.current_user().is_some()
  }

  /// Sign in by name, registering the name if nobody has it yet.
  ///
  /// Both inputs are trimmed. A known name with a different password yields
  /// [`Error::InvalidCredentials`] and leaves the session as it was.
  pub async fn login<R: RemoteStore, S: CacheStorage>(
    &mut self,
    store: &TodoStore<R, S>,
    name: &str,
    password: &str,
  ) -> Result<LoginOutcome> {
    let name = name.trim();
    let password = password.trim();

    let outcome = match store.find_user_by_name(name).await? {
      Some(existing) if existing.password == password => LoginOutcome::SignedIn(existing),
      Some(_) => {
        info!(name, "Login rejected: wrong password");
        return Err(Error::InvalidCredentials(name.to_string()));
      }
      None => {
        let created = store.create(User::new(name, password)).await?;
        info!(name, offline = created.is_offline(), "Registered new user");
        LoginOutcome::Registered(created.data)
      }
    };

    store.cache().write_session(outcome.user());
    self.state = SessionState::Authenticated(outcome.user().clone());
    info!(name, "Signed in");
    Ok(outcome)
  }

  /// Forget the current user, here and in the session slot.
  pub fn logout<S: CacheStorage>(&mut self, cache: &LocalCache<S>) {
    if let SessionState::Authenticated(user) = &self.state {
      info!(name = %user.name, "Signed out");
    }
    self.state = SessionState::Anonymous;
    cache.clear_session();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{Slot, SqliteStorage};
  use crate::remote::fake::MemoryRemote;
  use crate::remote::OfflineRemote;

  fn store<R: RemoteStore>(remote: R) -> TodoStore<R, SqliteStorage> {
    TodoStore::new(
      remote,
      LocalCache::new(SqliteStorage::open_in_memory().unwrap()),
    )
  }

  #[tokio::test]
  async fn test_unknown_name_registers_and_authenticates() {
    let store = store(MemoryRemote::new());
    let mut session = Session::default();

    let outcome = session.login(&store, " ann ", " secret ").await.unwrap();

    let LoginOutcome::Registered(user) = outcome else {
      panic!("expected registration, got {:?}", outcome);
    };
    assert_eq!(user.name, "ann");
    assert_eq!(user.password, "secret");
    assert!(!user.id.is_empty());
    assert_eq!(session.current_user(), Some(&user));
    assert_eq!(store.cache().read_session(), Some(user));
  }

  #[tokio::test]
  async fn test_known_name_right_password_signs_in() {
    let store = store(MemoryRemote::new());
    store.create(User::new("ann", "secret")).await.unwrap();
    let mut session = Session::default();

    let outcome = session.login(&store, "ann", "secret").await.unwrap();

    assert!(matches!(outcome, LoginOutcome::SignedIn(ref u) if u.name == "ann"));
    assert!(session.is_authenticated());
    // No second user was created
    assert_eq!(store.list::<User>().await.unwrap().data.len(), 1);
  }

  #[tokio::test]
  async fn test_wrong_password_stays_anonymous() {
    let store = store(MemoryRemote::new());
    store.create(User::new("ann", "secret")).await.unwrap();
    let mut session = Session::default();

    let err = session.login(&store, "ann", "guess").await.unwrap_err();

    assert!(matches!(err, Error::InvalidCredentials(ref name) if name == "ann"));
    assert_eq!(session.state(), &SessionState::Anonymous);
    assert_eq!(store.cache().read_session(), None);
  }

  #[tokio::test]
  async fn test_password_comparison_is_exact() {
    let store = store(OfflineRemote);
    store.create(User::new("ann", "Secret")).await.unwrap();
    let mut session = Session::default();

    assert!(session.login(&store, "ann", "secret").await.is_err());
    // Surrounding whitespace is trimmed before comparing
    assert!(session.login(&store, "ann", "  Secret\n").await.is_ok());
  }

  #[tokio::test]
  async fn test_wrong_password_keeps_previous_user() {
    let store = store(OfflineRemote);
    let mut session = Session::default();
    session.login(&store, "ann", "x").await.unwrap();
    session.login(&store, "bea", "y").await.unwrap();

    assert!(session.login(&store, "ann", "nope").await.is_err());
    assert_eq!(session.current_user().map(|u| u.name.as_str()), Some("bea"));
  }

  #[tokio::test]
  async fn test_offline_registration_then_login() {
    let store = store(OfflineRemote);
    let mut session = Session::default();

    let first = session.login(&store, "ann", "x").await.unwrap();
    assert!(matches!(first, LoginOutcome::Registered(_)));

    let second = session.login(&store, "ann", "x").await.unwrap();
    assert!(matches!(second, LoginOutcome::SignedIn(_)));
    assert_eq!(first.user(), second.user());
  }

  #[tokio::test]
  async fn test_logout_clears_state_and_slot() {
    let store = store(OfflineRemote);
    let mut session = Session::default();
    session.login(&store, "ann", "x").await.unwrap();

    session.logout(store.cache());

    assert_eq!(session.state(), &SessionState::Anonymous);
    assert_eq!(store.cache().read_session(), None);
    assert!(matches!(session.require_user(), Err(Error::NotSignedIn)));
  }

  #[tokio::test]
  async fn test_restore_rehydrates_session() {
    let store = store(OfflineRemote);
    let mut session = Session::default();
    session.login(&store, "ann", "x").await.unwrap();

    let restored = Session::restore(store.cache());

    assert_eq!(restored.current_user(), session.current_user());
  }

  #[test]
  fn test_restore_malformed_slot_is_anonymous() {
    let cache = LocalCache::new(SqliteStorage::open_in_memory().unwrap());
    cache.storage().put(Slot::Session.key(), "{\"name\": 42").unwrap();

    let session = Session::restore(&cache);

    assert_eq!(session.state(), &SessionState::Anonymous);
  }
}
