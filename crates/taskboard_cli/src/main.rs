//! Command-line front end for the task core.
//!
//! # Responsibility
//! - Stand in for a UI layer: parse user intents, call core use-cases,
//!   print projections.
//! - Keep every state change inside `taskboard_core`.

use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use taskboard_core::{
    core_version, default_log_level, init_logging, ConfigError, FileSlotStorage, FilterMode,
    LoadOutcome, LogConfig, PersistenceAdapter, PersistenceError, Priority, ServiceError,
    SlotStorage, SortKey, SqliteSlotStorage, StorageError, StoreConfig, Task, TaskDraft,
    TaskService, TaskStore, ViewQuery, DEFAULT_SLOT_KEY,
};

const APP_DIR_NAME: &str = "taskboard";
const SQLITE_FILE_NAME: &str = "taskboard.db";
const EMPTY_LIST_MESSAGE: &str = "No tasks found. Add a new task to get started!";

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Personal task board")]
struct Cli {
    /// Directory holding the task slot (and logs unless --log-dir is set).
    #[arg(long, env = "TASKBOARD_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Backend::File, global = true)]
    backend: Backend,

    /// Storage slot holding the task collection.
    #[arg(long, default_value = DEFAULT_SLOT_KEY, global = true)]
    slot: String,

    #[arg(long, env = "TASKBOARD_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, env = "TASKBOARD_LOG_DIR", global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// One JSON file per slot.
    File,
    /// SQLite key-value table.
    Sqlite,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Task(TaskCommand),
    /// Print the core library version.
    Version,
}

/// Subcommands that open the task store.
#[derive(Debug, Subcommand)]
enum TaskCommand {
    /// Create a task.
    Add {
        title: String,
        #[arg(long, short, default_value = "")]
        description: String,
        #[arg(long, short, default_value = "medium")]
        priority: Priority,
    },
    /// Edit title, description or priority of a task.
    Edit {
        id: String,
        #[arg(long, short)]
        title: Option<String>,
        #[arg(long, short)]
        description: Option<String>,
        #[arg(long, short)]
        priority: Option<Priority>,
    },
    /// Flip a task between active and completed.
    Toggle { id: String },
    /// Delete a task.
    Delete { id: String },
    /// Drop DRAGGED onto TARGET in the manual order.
    Move { dragged: String, target: String },
    /// List tasks.
    List {
        #[arg(long, short, default_value = "all")]
        filter: FilterMode,
        #[arg(long, short, default_value = "createdAt")]
        sort: SortKey,
    },
    /// Show one task in full.
    Show { id: String },
}

#[derive(Debug)]
enum CliError {
    NoDataDir,
    Config(ConfigError),
    Storage(StorageError),
    Service(ServiceError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDataDir => write!(
                f,
                "cannot determine a data directory; pass --data-dir or set TASKBOARD_DATA_DIR"
            ),
            Self::Config(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoDataDir => None,
            Self::Config(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Service(err) => Some(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StorageError> for CliError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let command = match cli.command {
        Command::Version => {
            println!("taskboard_core {}", core_version());
            return Ok(());
        }
        Command::Task(command) => command,
    };

    let data_dir = resolve_data_dir(cli.data_dir)?;
    start_logging(cli.log_level.as_deref(), cli.log_dir, &data_dir);

    let config = StoreConfig::new(cli.slot)?;
    let storage = open_storage(cli.backend, &data_dir)?;
    let (mut store, outcome) = TaskStore::open(PersistenceAdapter::new(storage, config));
    if let LoadOutcome::Recovered(err) = &outcome {
        eprintln!("warning: {err}; starting with an empty task list");
    }

    let mut service = TaskService::new(&mut store);
    execute(&mut service, command)?;
    drop(service);

    store.close();
    Ok(())
}

fn execute<S: SlotStorage>(
    service: &mut TaskService<'_, S>,
    command: TaskCommand,
) -> Result<(), CliError> {
    match command {
        TaskCommand::Add {
            title,
            description,
            priority,
        } => {
            let draft = TaskDraft::new(title)
                .description(description)
                .priority(priority);
            let receipt = service.create_task(draft)?;
            warn_unsaved(receipt.save_error.as_ref());
            println!("created {}", receipt.task_id);
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            priority,
        } => {
            let id = service.resolve_id(&id)?;
            let mut draft = TaskDraft::from_task(&service.get_task(id)?);
            if let Some(title) = title {
                draft.title = title;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(priority) = priority {
                draft.priority = priority;
            }
            let receipt = service.edit_task(id, draft)?;
            warn_unsaved(receipt.save_error.as_ref());
            println!("updated {id}");
        }
        TaskCommand::Toggle { id } => {
            let id = service.resolve_id(&id)?;
            let receipt = service.toggle_task(id)?;
            warn_unsaved(receipt.save_error.as_ref());
            let state = if service.get_task(id)?.completed {
                "completed"
            } else {
                "active"
            };
            println!("{id} is now {state}");
        }
        TaskCommand::Delete { id } => {
            let id = service.resolve_id(&id)?;
            let receipt = service.delete_task(id)?;
            warn_unsaved(receipt.save_error.as_ref());
            println!("deleted {id}");
        }
        TaskCommand::Move { dragged, target } => {
            let dragged = service.resolve_id(&dragged)?;
            let target = service.resolve_id(&target)?;
            let receipt = service.move_task(dragged, target)?;
            warn_unsaved(receipt.save_error.as_ref());
            if receipt.changed {
                println!("moved {dragged}");
            } else {
                println!("order unchanged");
            }
        }
        TaskCommand::List { filter, sort } => {
            let tasks = service.visible_tasks(ViewQuery::new(filter, sort));
            let counts = service.counts();
            println!(
                "{} task(s): {} active, {} completed (filter={filter}, sort={sort})",
                counts.total, counts.active, counts.completed
            );
            if tasks.is_empty() {
                println!("{EMPTY_LIST_MESSAGE}");
            }
            for task in &tasks {
                println!("{}", render_row(task));
            }
        }
        TaskCommand::Show { id } => {
            let id = service.resolve_id(&id)?;
            let task = service.get_task(id)?;
            println!("id:          {}", task.id);
            println!("title:       {}", task.title);
            println!("description: {}", task.description);
            println!("priority:    {}", task.priority);
            println!("completed:   {}", task.completed);
            println!("created:     {}", task.created_at.format("%Y-%m-%d %H:%M UTC"));
        }
    }
    Ok(())
}

fn render_row(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let short_id: String = task.id.to_string().chars().take(8).collect();
    format!(
        "[{mark}] {short_id}  {:<6}  {}  {}",
        task.priority,
        task.created_at.format("%Y-%m-%d"),
        task.title
    )
}

fn warn_unsaved(err: Option<&PersistenceError>) {
    if let Some(err) = err {
        eprintln!("warning: change applied but not saved: {err}");
    }
}

/// Explicit flag/env value first, then the platform data dir. Always absolute.
fn resolve_data_dir(explicit: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let dir = explicit
        .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME)))
        .ok_or(CliError::NoDataDir)?;
    let dir = std::path::absolute(&dir).map_err(StorageError::from)?;
    Ok(dir)
}

fn open_storage(backend: Backend, data_dir: &Path) -> Result<Box<dyn SlotStorage>, CliError> {
    let storage: Box<dyn SlotStorage> = match backend {
        Backend::File => Box::new(FileSlotStorage::new(data_dir)?),
        Backend::Sqlite => {
            std::fs::create_dir_all(data_dir).map_err(StorageError::from)?;
            Box::new(SqliteSlotStorage::open(data_dir.join(SQLITE_FILE_NAME))?)
        }
    };
    Ok(storage)
}

fn start_logging(level: Option<&str>, log_dir: Option<PathBuf>, data_dir: &Path) {
    let level = level.unwrap_or_else(|| default_log_level());
    let log_dir = log_dir.unwrap_or_else(|| data_dir.join("logs"));
    let result = LogConfig::new(level, &log_dir).and_then(|config| init_logging(&config));
    match result {
        Ok(()) => info!("event=cli_start module=cli status=ok"),
        Err(err) => eprintln!("warning: logging disabled: {err}"),
    }
}
