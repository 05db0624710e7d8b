use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::form::FormValues;
use crate::model::{Priority, SortKey, TaskFilter};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "smart-todo",
    version,
    about = "A local-first task list for the terminal.",
    after_help = "Examples:\n  smart-todo                 Launch the TUI (same as `smart-todo tui`)\n  smart-todo add Buy milk --due tomorrow --priority high\n  smart-todo list --filter pending --sort priority-desc\n  smart-todo delete 7K3QZP --yes"
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter written to the log file (e.g. "info", "todo_core=debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui,
    /// Print the task list using a filter and sort order
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Flip the completed flag of one or more tasks
    Toggle(IdsArgs),
    /// Delete one or more tasks by id
    Delete(DeleteArgs),
    /// Switch between the light and dark theme
    Theme,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Which tasks to show
    #[arg(long, value_enum, default_value_t = TaskFilter::All)]
    pub filter: TaskFilter,

    /// Display order
    #[arg(long, value_enum, default_value_t = SortKey::DateDesc)]
    pub sort: SortKey,

    /// Emit the rendered view as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task title
    #[arg(value_name = "TITLE", required = true)]
    pub title: Vec<String>,

    /// Optional longer description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Due date (YYYY-MM-DD, today, tomorrow, +3d, mon)
    #[arg(long = "due", value_name = "DATE")]
    pub due_date: Option<String>,

    /// Priority (low, medium, high)
    #[arg(long, short = 'p', value_enum, default_value_t = Priority::Medium)]
    pub priority: Priority,
}

#[derive(Args, Debug, Clone)]
pub struct IdsArgs {
    /// Task ids (full id or the short suffix shown by `list`)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Task ids (full id or the short suffix shown by `list`)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,

    /// Confirm the deletion; without it nothing is removed
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl From<&AddArgs> for FormValues {
    fn from(args: &AddArgs) -> Self {
        FormValues {
            title: args.title.join(" "),
            description: args.description.clone().unwrap_or_default(),
            due_date: args.due_date.clone().unwrap_or_default(),
            priority: args.priority.as_str().to_string(),
        }
    }
}
