use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::task::{Filter, TaskId};

#[derive(Parser)]
#[command(name = "tally", about = concat!("[x] tally v", env!("CARGO_PKG_VERSION"), " - a todo list that syncs"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different config file
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Work against an in-memory store instead of the configured endpoint
    #[arg(long, global = true)]
    pub offline: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Point tally at a task endpoint (writes the config file)
    Init(InitArgs),
    /// List tasks
    List(ListArgs),
    /// Add a task
    Add(AddArgs),
    /// Toggle a task between active and completed
    Toggle(IdArgs),
    /// Change a task's title
    Rename(RenameArgs),
    /// Delete a task
    Rm(IdArgs),
    /// Delete all completed tasks
    Clear,
    /// Move a task to a new position
    Mv(MvArgs),
    /// Show how many tasks are left
    Count,
}

#[derive(Args)]
pub struct InitArgs {
    /// Base URL of the task endpoint, e.g. http://127.0.0.1:8000
    #[arg(long)]
    pub url: String,
    /// Request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Which tasks to show (all, active, completed)
    #[arg(long, short, default_value = "all")]
    pub filter: Filter,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: TaskId,
}

#[derive(Args)]
pub struct RenameArgs {
    /// Task ID
    pub id: TaskId,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct MvArgs {
    /// Task ID
    pub id: TaskId,
    /// Target position among visible tasks (0 = top)
    pub index: usize,
}
