use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use clap::{CommandFactory, Parser};
use tracing::info;

mod cli;
mod config;
mod error;
mod model;
mod render;
mod storage;
mod store;
mod theme;

use cli::{Cli, Command};
use config::Config;
use error::{Result, TaskListError};
use model::{find_color, Filter, SortBy, Task, TaskId};
use render::Renderer;
use store::TaskStore;
use theme::{DynamicTheme, Palette};

fn setup_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Starting tasklist v{}", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(cli.config.clone()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::from(1);
        }
    };

    match run(cli.command, config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Builds the store with the theme handle wired in as its observer, then
/// loads saved preferences and tasks.
fn open_store(config: &Config) -> Result<(TaskStore, Renderer)> {
    let storage = storage::from_config(config)?;
    info!(dir = %storage.dir().display(), "Opened storage");
    let preferences = config.preferences()?;

    let theme = DynamicTheme::new(Palette::load(preferences.theme));
    let mut store = TaskStore::new(Box::new(storage)).with_preferences(preferences);
    store.set_theme_observer(Box::new(theme.clone()));

    store.load_preferences()?;
    store.load_tasks()?;
    info!(
        tasks = store.tasks().len(),
        theme = %store.theme(),
        "Store ready"
    );

    Ok((store, Renderer::new(theme, stdout_is_tty())))
}

fn stdout_is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn run(command: Command, config: Config) -> Result<()> {
    match command {
        Command::Add {
            title,
            due,
            priority,
            color,
        } => {
            let (mut store, _) = open_store(&config)?;

            let mut task = Task::new(next_id(&store), title.join(" "));
            task.due_date = due.as_deref().map(parse_due).transpose()?;
            task.priority = priority;
            task.color = color.as_deref().map(color_name).transpose()?;

            let (id, title) = (task.id.clone(), task.title.clone());
            store.add_task(task)?;
            println!("✓ Added task: {} (ID: {})", title, id);
        }
        Command::List {
            filter,
            sort,
            format,
        } => {
            let (mut store, renderer) = open_store(&config)?;

            if let Some(filter) = filter {
                store.set_filter(filter.parse()?);
            }
            if let Some(sort) = sort {
                store.set_sort_by(sort.parse()?);
            }

            let tasks = store.filtered_tasks();
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&tasks)?),
                _ => {
                    let numbered =
                        store.filter() == Filter::All && store.sort_by() == SortBy::Manual;
                    println!("{}", renderer.task_list(&tasks, numbered));
                }
            }
        }
        Command::Show { id, format } => {
            let (store, renderer) = open_store(&config)?;
            let task = require_task(&store, &id)?;

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(task)?),
                _ => println!("{}", renderer.task_detail(task)),
            }
        }
        Command::Edit {
            id,
            title,
            due,
            clear_due,
            priority,
            color,
            clear_color,
        } => {
            let (mut store, _) = open_store(&config)?;
            let mut task = require_task(&store, &id)?.clone();

            if let Some(title) = title {
                task.title = title;
            }
            if clear_due {
                task.due_date = None;
            } else if let Some(due) = due.as_deref() {
                task.due_date = Some(parse_due(due)?);
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }
            if clear_color {
                task.color = None;
            } else if let Some(color) = color.as_deref() {
                task.color = Some(color_name(color)?);
            }

            let title = task.title.clone();
            store.update_task(task)?;
            println!("✓ Updated task: {}", title);
        }
        Command::Toggle { id } => {
            let (mut store, _) = open_store(&config)?;
            require_task(&store, &id)?;

            store.toggle_complete(&id)?;
            if let Some(task) = store.get_task_by_id(&id) {
                let state = if task.completed { "completed" } else { "active" };
                println!("✓ Marked {}: {}", state, task.title);
            }
        }
        Command::Delete { id } => {
            let (mut store, _) = open_store(&config)?;
            let title = require_task(&store, &id)?.title.clone();

            store.delete_task(&id)?;
            println!("✓ Deleted task: {}", title);
        }
        Command::Move { from, to } => {
            let (mut store, _) = open_store(&config)?;
            let len = store.tasks().len();

            // Positions are 1-based on the command line.
            let from_index = from
                .checked_sub(1)
                .ok_or(TaskListError::InvalidIndex { index: from, len })?;
            let to_index = to
                .checked_sub(1)
                .ok_or(TaskListError::InvalidIndex { index: to, len })?;

            store
                .reorder_tasks(from_index, to_index)
                .map_err(|e| match e {
                    TaskListError::InvalidIndex { index, len } => TaskListError::InvalidIndex {
                        index: index + 1,
                        len,
                    },
                    other => other,
                })?;
            println!("✓ Moved task {} to position {}", from, to);
        }
        Command::Filter { value } => {
            let (mut store, _) = open_store(&config)?;
            store.set_filter(value.parse()?);
            store.save_preferences()?;
            println!("Filter: {}", store.filter());
        }
        Command::Sort { value } => {
            let (mut store, _) = open_store(&config)?;
            store.set_sort_by(value.parse()?);
            store.save_preferences()?;
            println!("Sort: {}", store.sort_by());
        }
        Command::Theme => {
            let (mut store, renderer) = open_store(&config)?;
            let theme = store.toggle_theme();
            store.save_preferences()?;
            println!("{}", renderer.theme_banner(theme));
        }
        Command::Colors => {
            // The catalog is fixed, so stored tasks are never loaded here.
            let store = TaskStore::new(Box::new(storage::from_config(&config)?));
            let theme = DynamicTheme::new(Palette::load(config.preferences()?.theme));
            let renderer = Renderer::new(theme, stdout_is_tty());
            for option in store.color_options() {
                println!("{}", renderer.color_line(option));
            }
        }
        Command::Config => {
            let config_toml = toml::to_string_pretty(&config).map_err(|e| {
                TaskListError::Config(format!("Failed to serialize config: {}", e))
            })?;
            println!("{}", config_toml);
        }
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

fn require_task<'a>(store: &'a TaskStore, id: &str) -> Result<&'a Task> {
    store
        .get_task_by_id(id)
        .ok_or_else(|| TaskListError::TaskNotFound(id.to_string()))
}

/// Millisecond timestamp, bumped until no stored task uses it.
fn next_id(store: &TaskStore) -> TaskId {
    let mut candidate = Utc::now().timestamp_millis();
    while store.get_task_by_id(&candidate.to_string()).is_some() {
        candidate += 1;
    }
    candidate.to_string()
}

fn parse_due(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| TaskListError::InvalidDate(text.to_string()))
}

fn color_name(text: &str) -> Result<String> {
    find_color(text)
        .map(|c| c.name.to_string())
        .ok_or_else(|| TaskListError::UnknownColor(text.to_string()))
}
