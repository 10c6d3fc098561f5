mod init;
pub use init::cmd_init;

use std::path::PathBuf;

use tracing::debug;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::model::config::Config;
use crate::model::task::{Filter, Task, TaskId};
use crate::ops::{TaskManager, task_ops};
use crate::remote::{HttpRemote, MemoryStore, RemoteStore};

pub type Session = TaskManager<Box<dyn RemoteStore>>;

/// Resolved global settings shared by every command
pub struct Context {
    pub config: Config,
    pub config_path: PathBuf,
    pub offline: bool,
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(command: Commands, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // Init edits the config file and never opens a session
        Commands::Init(args) => cmd_init(args, ctx),

        // Read commands
        Commands::List(args) => cmd_list(args, ctx),
        Commands::Count => cmd_count(ctx),

        // Write commands
        Commands::Add(args) => cmd_add(args, ctx),
        Commands::Toggle(args) => cmd_toggle(args, ctx),
        Commands::Rename(args) => cmd_rename(args, ctx),
        Commands::Rm(args) => cmd_rm(args, ctx),
        Commands::Clear => cmd_clear(ctx),
        Commands::Mv(args) => cmd_mv(args, ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The configured endpoint, or an in-memory store when offline
pub fn open_remote(ctx: &Context) -> Result<Box<dyn RemoteStore>, Box<dyn std::error::Error>> {
    if ctx.offline {
        return Ok(Box::new(MemoryStore::new()));
    }
    Ok(Box::new(HttpRemote::from_config(&ctx.config.remote)?))
}

/// Connect and fetch. A missing token is logged by the manager and otherwise
/// ignored; the fetch must succeed.
pub fn open_session(ctx: &Context) -> Result<Session, Box<dyn std::error::Error>> {
    let remote = open_remote(ctx)?;
    let mut session = TaskManager::new(remote, ctx.config.history_depth());
    if let Err(e) = session.connect() {
        debug!(error = %e, "continuing without a session token");
    }
    session.load_all()?;
    Ok(session)
}

fn not_found(id: TaskId) -> Box<dyn std::error::Error> {
    format!("task not found: #{}", id).into()
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(ctx)?;
    let tasks = session.filtered(args.filter);
    let items_left = session.items_remaining();

    if ctx.json {
        let list = TaskListJson {
            filter: args.filter,
            items_left,
            tasks: tasks.iter().map(|t| task_to_json(t)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        for line in format_listing(&tasks, args.filter, items_left) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_count(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session(ctx)?;
    let items_left = session.items_remaining();
    if ctx.json {
        println!("{}", serde_json::to_string(&CountJson { items_left })?);
    } else {
        println!("{}", format_items_left(items_left));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands: fetch, apply one operation, save
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    if args.title.trim().is_empty() {
        return Err("task title cannot be empty".into());
    }
    let mut session = open_session(ctx)?;
    let task = add_task(&mut session, &args.title)?;
    if ctx.json {
        println!("{}", serde_json::to_string(&task_to_json(&task))?);
    } else {
        println!("added {}", format_task_line(&task));
    }
    Ok(())
}

fn cmd_toggle(args: IdArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(ctx)?;
    let task = toggle_task(&mut session, args.id)?;
    println!("{}", format_task_line(&task));
    Ok(())
}

fn cmd_rename(args: RenameArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(ctx)?;
    let task = rename_task(&mut session, args.id, &args.title)?;
    println!("{}", format_task_line(&task));
    Ok(())
}

fn cmd_rm(args: IdArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(ctx)?;
    remove_task(&mut session, args.id)?;
    println!("deleted #{}", args.id);
    Ok(())
}

fn cmd_clear(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(ctx)?;
    let count = clear_completed(&mut session)?;
    println!(
        "cleared {} completed task{}",
        count,
        if count == 1 { "" } else { "s" }
    );
    Ok(())
}

fn cmd_mv(args: MvArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(ctx)?;
    move_to_visible_index(&mut session, args.id, args.index)?;
    let lines = format_listing(&session.visible(), Filter::All, session.items_remaining());
    for line in lines {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Session operations behind the write commands
// ---------------------------------------------------------------------------

fn add_task<R: RemoteStore>(
    session: &mut TaskManager<R>,
    title: &str,
) -> Result<Task, Box<dyn std::error::Error>> {
    let id = session.create(title)?;
    session.save()?;
    session.find(id).cloned().ok_or_else(|| not_found(id))
}

fn toggle_task<R: RemoteStore>(
    session: &mut TaskManager<R>,
    id: TaskId,
) -> Result<Task, Box<dyn std::error::Error>> {
    if !session.toggle_completed(id) {
        return Err(not_found(id));
    }
    session.save()?;
    session.find(id).cloned().ok_or_else(|| not_found(id))
}

fn rename_task<R: RemoteStore>(
    session: &mut TaskManager<R>,
    id: TaskId,
    title: &str,
) -> Result<Task, Box<dyn std::error::Error>> {
    if !session.rename(id, title)? {
        return Err(not_found(id));
    }
    session.save()?;
    session.find(id).cloned().ok_or_else(|| not_found(id))
}

fn remove_task<R: RemoteStore>(
    session: &mut TaskManager<R>,
    id: TaskId,
) -> Result<(), Box<dyn std::error::Error>> {
    if !session.remove(id) {
        return Err(not_found(id));
    }
    session.save()?;
    Ok(())
}

/// Saves only when something was cleared
fn clear_completed<R: RemoteStore>(
    session: &mut TaskManager<R>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let count = session.remove_all_completed();
    if count > 0 {
        session.save()?;
    }
    Ok(count)
}

/// Move `id` so it lands at `index` among visible tasks (past the end means
/// last). Returns whether anything moved; saves only then.
fn move_to_visible_index<R: RemoteStore>(
    session: &mut TaskManager<R>,
    id: TaskId,
    index: usize,
) -> Result<bool, Box<dyn std::error::Error>> {
    if session.find(id).is_none_or(|t| t.is_deleted) {
        return Err(not_found(id));
    }
    // The index counts visible tasks; translate it to a position in the full
    // collection, which may still hold soft-deleted entries.
    let visible = session.visible();
    let target = visible.get(index).or(visible.last()).map(|t| t.id);
    let to_index = target
        .and_then(|target| task_ops::position_of(session.tasks(), target))
        .unwrap_or(0);
    let moved = session.move_task(id, to_index)?;
    if moved {
        session.save()?;
    }
    Ok(moved)
}
