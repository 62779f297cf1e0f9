//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers for the subcommands: task CRUD,
//! event upsert/clear, the week-axis printout, category renames, and the
//! TUI launcher.

use std::path::Path;

use chrono::{Local, NaiveDate, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::db::{print_table, Database};
use crate::tui::colors::parse_hex;
use crate::tui::run::run_tui;
use crate::week;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive timeline grid.
    Ui,

    /// Add a new task.
    Add {
        /// Name of the work item.
        name: String,
        /// Grouping label. Categories are derived from tasks, not declared.
        #[arg(long)]
        category: String,
        /// Intra-category ordering. Lower sorts first; ties break on id.
        #[arg(long, default_value_t = 0)]
        sort_order: i64,
    },

    /// List tasks grouped by category.
    List {
        /// Only show one category.
        #[arg(long)]
        category: Option<String>,
    },

    /// Update fields on a task.
    Update {
        /// Task ID to update.
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        sort_order: Option<i64>,
    },

    /// Delete a task and all its events.
    Delete {
        /// Task ID to delete.
        id: u64,
    },

    /// Manage week events on a task.
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Print the week-date axis with current/past markers.
    Weeks {
        /// Weeks before the current week (defaults to the stored setting).
        #[arg(long)]
        back: Option<u32>,
        /// Weeks after the current week (defaults to the stored setting).
        #[arg(long)]
        forward: Option<u32>,
    },

    /// Rewrite a category label on every task carrying it.
    RenameCategory {
        /// Current category name.
        from: String,
        /// New category name.
        to: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// Create or replace the event at (task, week).
    Set {
        /// Task ID the event belongs to.
        task_id: u64,
        /// Week date (YYYY-MM-DD). Snapped to its week start.
        week_date: String,
        /// Short display text for the cell.
        #[arg(long)]
        label: Option<String>,
        /// Display colour, e.g. "#ff0000".
        #[arg(long)]
        color: Option<String>,
    },
    /// Remove the event at (task, week).
    Clear {
        /// Task ID the event belongs to.
        task_id: u64,
        /// Week date (YYYY-MM-DD). Snapped to its week start.
        week_date: String,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(db_path: &Path) {
    if let Err(e) = run_tui(db_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the database.
pub fn cmd_add(db: &mut Database, db_path: &Path, name: String, category: String, sort_order: i64) {
    let category = category.trim();
    let name = name.trim();
    if category.is_empty() || name.is_empty() {
        eprintln!("Task name and category must be non-empty");
        std::process::exit(2);
    }
    let id = db.add_task(category, name, sort_order);
    if let Err(e) = db.save(db_path) {
        eprintln!("Error saving: {e}");
        std::process::exit(1);
    }
    println!("Added task {id}: [{category}] {name}");
}

/// List tasks grouped by category.
pub fn cmd_list(db: &Database, category: Option<String>) {
    if db.tasks.is_empty() {
        println!("No tasks yet. Add one with: ptl add <name> --category <category>");
        return;
    }
    print_table(db, category.as_deref());
}

/// Update fields on a task.
pub fn cmd_update(
    db: &mut Database,
    db_path: &Path,
    id: u64,
    name: Option<String>,
    category: Option<String>,
    sort_order: Option<i64>,
) {
    let Some(task) = db.get_task_mut(id) else {
        eprintln!("Task {id} not found");
        std::process::exit(2);
    };
    if let Some(name) = name {
        task.task = name;
    }
    if let Some(category) = category {
        task.category = category;
    }
    if let Some(sort_order) = sort_order {
        task.sort_order = sort_order;
    }
    task.updated_at_utc = Utc::now().timestamp();
    if let Err(e) = db.save(db_path) {
        eprintln!("Error saving: {e}");
        std::process::exit(1);
    }
    println!("Updated task {id}");
}

/// Delete a task and cascade its events.
pub fn cmd_delete(db: &mut Database, db_path: &Path, id: u64) {
    if !db.remove_task(id) {
        eprintln!("Task {id} not found");
        std::process::exit(2);
    }
    if let Err(e) = db.save(db_path) {
        eprintln!("Error saving: {e}");
        std::process::exit(1);
    }
    println!("Deleted task {id} and its events");
}

/// Parse a week-date argument and snap it to its Sunday week start.
fn parse_week_date(s: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => week::start_of_week(date),
        Err(_) => {
            eprintln!("Invalid date '{s}', expected YYYY-MM-DD");
            std::process::exit(2);
        }
    }
}

/// Create or replace an event at (task, week).
pub fn cmd_event_set(
    db: &mut Database,
    db_path: &Path,
    task_id: u64,
    week_date: String,
    label: Option<String>,
    color: Option<String>,
) {
    if db.get_task(task_id).is_none() {
        eprintln!("Task {task_id} not found");
        std::process::exit(2);
    }
    if let Some(ref c) = color {
        if parse_hex(c).is_none() {
            eprintln!("Invalid colour '{c}', expected \"#rrggbb\"");
            std::process::exit(2);
        }
    }
    let date = parse_week_date(&week_date);
    db.upsert_event(task_id, date, label, color);
    if let Err(e) = db.save(db_path) {
        eprintln!("Error saving: {e}");
        std::process::exit(1);
    }
    println!("Set event on task {task_id} for week of {date}");
}

/// Remove an event at (task, week).
pub fn cmd_event_clear(db: &mut Database, db_path: &Path, task_id: u64, week_date: String) {
    let date = parse_week_date(&week_date);
    if !db.clear_event(task_id, date) {
        eprintln!("No event on task {task_id} for week of {date}");
        std::process::exit(2);
    }
    if let Err(e) = db.save(db_path) {
        eprintln!("Error saving: {e}");
        std::process::exit(1);
    }
    println!("Cleared event on task {task_id} for week of {date}");
}

/// Print the week axis with current/past markers.
pub fn cmd_weeks(db: &Database, back: Option<u32>, forward: Option<u32>) {
    let today = Local::now().date_naive();
    let axis = week::week_axis(
        today,
        back.unwrap_or(db.settings.weeks_back),
        forward.unwrap_or(db.settings.weeks_forward),
    );
    for date in axis {
        let marker = if week::current_week(date) {
            "  <- current"
        } else if week::past_week(date) {
            "  (past)"
        } else {
            ""
        };
        println!("{}  {}{}", date, week::format_header(date), marker);
    }
}

/// Rewrite a category on every task carrying it.
pub fn cmd_rename_category(db: &mut Database, db_path: &Path, from: String, to: String) {
    let to = to.trim();
    if to.is_empty() {
        eprintln!("New category name must be non-empty");
        std::process::exit(2);
    }
    let touched = db.rename_category(&from, to);
    if touched == 0 {
        println!("No tasks in category '{from}'");
        return;
    }
    if let Err(e) = db.save(db_path) {
        eprintln!("Error saving: {e}");
        std::process::exit(1);
    }
    println!("Renamed '{from}' to '{to}' on {touched} task(s)");
}

/// Generate shell completion scripts to stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
