//! CLI definition for the FocusFlow command-line interface.
//!
//! This module only depends on `clap` and `std`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Persistence backend selectable from the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Keep tasks in memory for this invocation only
    Memory,
    /// One JSON file holding every task
    KeyValue,
    /// SQLite database, one row per task
    Database,
}

/// Board column
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Todo,
    InProgress,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    System,
}

/// FocusFlow - an offline task board
///
/// Tasks live in three columns and are stored locally; nothing leaves your machine.
#[derive(Parser, Debug)]
#[command(name = "focusflow")]
#[command(version)]
#[command(about = "FocusFlow - offline task board")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Storage backend (overrides configuration)
    #[arg(long, value_enum, global = true)]
    pub backend: Option<BackendArg>,

    /// Directory holding the task data (overrides configuration)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Task(TaskCommand),
    /// Show or change application settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

/// Commands that load the task board
#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// List tasks
    List {
        /// Only tasks in this column
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        /// Case-insensitive text to find in title or description
        #[arg(long)]
        search: Option<String>,
        /// Hide completed tasks
        #[arg(long)]
        active: bool,
        /// Newest first
        #[arg(long)]
        recent: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the three columns side by side
    Board {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a task in the To Do column
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Tag, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        /// Estimated pomodoros
        #[arg(short, long)]
        estimate: Option<u32>,
    },
    /// Show one task
    Show {
        /// Task id or unique id prefix
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit task fields
    Update {
        /// Task id or unique id prefix
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// New description; an empty value clears it
        #[arg(long)]
        description: Option<String>,
        /// Replace the tags, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Remove every tag
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
        /// Due date, YYYY-MM-DD, or `none` to clear
        #[arg(long)]
        due: Option<String>,
        /// Estimated pomodoros
        #[arg(long)]
        estimate: Option<u32>,
        /// Completed pomodoros
        #[arg(long)]
        pomodoros_done: Option<u32>,
    },
    /// Move a task to another column
    Status {
        /// Task id or unique id prefix
        id: String,
        #[arg(value_enum)]
        status: StatusArg,
    },
    /// Drag a task onto a column or another task
    Drag {
        /// Task being dragged
        active: String,
        /// Column (todo, in-progress, completed) or task id; omit to drop on nothing
        over: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task id or unique id prefix
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current settings
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change one or more settings
    Set {
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
        /// Work session length in minutes
        #[arg(long)]
        work: Option<u32>,
        /// Short break length in minutes
        #[arg(long)]
        short_break: Option<u32>,
        /// Long break length in minutes
        #[arg(long)]
        long_break: Option<u32>,
        /// Pomodoros before a long break
        #[arg(long)]
        interval: Option<u32>,
        #[arg(long)]
        auto_start_breaks: Option<bool>,
        #[arg(long)]
        auto_start_pomodoros: Option<bool>,
    },
}
