use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "A task list with filters, sorting and themes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (default: ~/.config/tasklist/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a task
    Add {
        /// Task title
        #[arg(required = true)]
        title: Vec<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long)]
        due: Option<String>,

        /// Priority, higher is more urgent
        #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
        priority: i64,

        /// Color name from `tasklist colors`
        #[arg(short, long)]
        color: Option<String>,
    },

    /// List tasks using the saved filter and sort order
    List {
        /// Filter for this listing: all, active, completed
        #[arg(short, long)]
        filter: Option<String>,

        /// Sort for this listing: date, priority, title, manual
        #[arg(short, long)]
        sort: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show a single task
    Show {
        id: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Edit fields of a task
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<String>,

        #[arg(long)]
        clear_due: bool,

        #[arg(short, long, allow_negative_numbers = true)]
        priority: Option<i64>,

        #[arg(short, long, conflicts_with = "clear_color")]
        color: Option<String>,

        #[arg(long)]
        clear_color: bool,
    },

    /// Mark a task completed, or active again
    Toggle { id: String },

    /// Delete a task
    Delete { id: String },

    /// Move a task to another position (1-based, as shown by `list -f all -s manual`)
    Move { from: usize, to: usize },

    /// Set the default filter: all, active, completed
    Filter { value: String },

    /// Set the default sort order: date, priority, title, manual
    Sort { value: String },

    /// Switch between the dark and light theme
    Theme,

    /// List the available task colors
    Colors,

    /// Print the active config (resolved, with defaults)
    Config,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
