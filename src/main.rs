use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use team_todo::board::{StatusFilter, TaskBoard};
use team_todo::cache::{CacheStorage, LocalCache, Slot, SqliteStorage};
use team_todo::config::Config;
use team_todo::notify::{Notifier, TerminalNotifier};
use team_todo::remote::{HttpRemote, OfflineRemote, Remote, RemoteStore};
use team_todo::render;
use team_todo::session::{LoginOutcome, Session};
use team_todo::store::TodoStore;
use team_todo::{logging, Error};

/// Width of the task text column in listings
const TEXT_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(name = "team-todo")]
#[command(about = "A shared to-do list that keeps working offline")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/team-todo/config.yaml)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Skip the remote store and work from the local cache only
  #[arg(long, global = true)]
  offline: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Sign in; an unknown name is registered with the given password
  Login { name: String, password: String },
  /// Sign out
  Logout,
  /// Show who is signed in
  Whoami,
  /// List tasks
  #[command(alias = "ls")]
  List {
    /// Only show completed or pending tasks
    #[arg(short, long, value_enum, default_value_t = StatusFilter::All)]
    filter: StatusFilter,
    /// Case-insensitive search over author and text
    #[arg(short, long)]
    search: Option<String>,
  },
  /// Add a task
  Add {
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
  },
  /// Mark a task as completed
  Done { id: String },
  /// Mark a task as pending again
  Undo { id: String },
  /// Replace the text of a task
  Edit {
    id: String,
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
  },
  /// Delete a task
  #[command(alias = "del")]
  Rm { id: String },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = Config::load(args.config.as_deref())?;
  let cache_path = config.cache_path()?;

  let log_dir = cache_path.parent().unwrap_or(Path::new("."));
  let _log_guard = logging::setup(log_dir)?;

  let remote = if args.offline {
    Remote::Offline(OfflineRemote)
  } else {
    Remote::Http(HttpRemote::new(&config.remote)?)
  };
  let cache = LocalCache::new(SqliteStorage::open_or_in_memory(&cache_path)?);
  let store = TodoStore::new(remote, cache);
  let mut session = Session::restore(store.cache());
  let notifier = TerminalNotifier;

  // Failures have already been shown as notices
  match run(args.command, &store, &mut session, &notifier).await {
    Ok(()) => Ok(ExitCode::SUCCESS),
    Err(_) => Ok(ExitCode::FAILURE),
  }
}

async fn run<R: RemoteStore, S: CacheStorage, N: Notifier>(
  command: Command,
  store: &TodoStore<R, S>,
  session: &mut Session,
  notifier: &N,
) -> team_todo::Result<()> {
  match command {
    Command::Login { name, password } => match session.login(store, &name, &password).await {
      Ok(LoginOutcome::SignedIn(user)) => {
        notifier.success(&format!("Welcome {}", user.name));
        Ok(())
      }
      Ok(LoginOutcome::Registered(user)) => {
        notifier.success(&format!("User created: {}", user.name));
        Ok(())
      }
      Err(Error::InvalidCredentials(_)) => Err(fail(
        notifier,
        Error::InvalidCredentials(name.trim().to_string()),
        "Wrong password. Check that you are using the right one.",
      )),
      Err(e) => {
        let message = format!("Login failed: {}", e);
        Err(fail(notifier, e, &message))
      }
    },

    Command::Logout => {
      session.logout(store.cache());
      notifier.info("Session closed");
      Ok(())
    }

    Command::Whoami => {
      match session.current_user() {
        Some(user) => println!("{}", user.name),
        None => println!("Not signed in"),
      }
      Ok(())
    }

    Command::List { filter, search } => {
      signed_in(session, notifier)?;
      let mut board = TaskBoard::new(store, notifier);
      board.load().await?;
      board.set_filter(filter);
      board.set_query(search.unwrap_or_default());

      if board.is_offline() {
        eprintln!(
          "{}",
          render::offline_banner(store.cache().written_at(Slot::Tasks))
        );
      }

      let visible = board.visible();
      if visible.is_empty() {
        println!("No tasks found.");
      }
      for task in visible {
        println!("{}", render::styled_task_line(task, TEXT_WIDTH));
      }
      Ok(())
    }

    Command::Add { text } => {
      let author = signed_in(session, notifier)?;
      let mut board = TaskBoard::new(store, notifier);
      let task = board.add(&author, &text.join(" ")).await?;
      println!("{}", render::styled_task_line(&task, TEXT_WIDTH));
      Ok(())
    }

    Command::Done { id } => toggle(store, session, notifier, &id, true).await,
    Command::Undo { id } => toggle(store, session, notifier, &id, false).await,

    Command::Edit { id, text } => {
      let editor = signed_in(session, notifier)?;
      let mut board = TaskBoard::new(store, notifier);
      board.load().await?;
      let task = board.edit(&id, &text.join(" "), &editor).await?;
      println!("{}", render::styled_task_line(&task, TEXT_WIDTH));
      Ok(())
    }

    Command::Rm { id } => {
      signed_in(session, notifier)?;
      let mut board = TaskBoard::new(store, notifier);
      board.remove(&id).await
    }
  }
}

async fn toggle<R: RemoteStore, S: CacheStorage, N: Notifier>(
  store: &TodoStore<R, S>,
  session: &Session,
  notifier: &N,
  id: &str,
  completed: bool,
) -> team_todo::Result<()> {
  signed_in(session, notifier)?;
  let mut board = TaskBoard::new(store, notifier);
  board.load().await?;
  let task = board.toggle(id, completed).await?;
  println!("{}", render::styled_task_line(&task, TEXT_WIDTH));
  Ok(())
}

/// Name of the signed-in user, or a notice and [`Error::NotSignedIn`].
fn signed_in<N: Notifier>(session: &Session, notifier: &N) -> team_todo::Result<String> {
  match session.require_user() {
    Ok(user) => Ok(user.name.clone()),
    Err(e) => {
      let message = e.to_string();
      Err(fail(notifier, e, &message))
    }
  }
}

fn fail<N: Notifier>(notifier: &N, e: Error, message: &str) -> Error {
  notifier.error(message);
  e
}
