//! # ptl - Project Timeline CLI
//!
//! A week-by-week project timeline tool with a Gantt-style grid TUI for
//! tracking categorised tasks and their weekly status events.
//!
//! ## Key Features
//!
//! - **Timeline Grid TUI**: tasks as rows grouped into collapsible categories,
//!   weeks as columns, with click-to-edit cells and current-week highlighting
//! - **Derived Categories**: free-text grouping labels, sorted and collapsible,
//!   with no separate category entity to maintain
//! - **Week Events**: one optional labelled, coloured marker per task per week
//! - **Full CLI**: scriptable task and event CRUD alongside the interactive UI
//! - **Local File Storage**: a single JSON file with atomic writes
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the timeline grid
//! ptl ui
//!
//! # Add tasks via CLI
//! ptl add "Post JD" --category Hiring
//! ptl add "Buy laptops" --category IT
//!
//! # Mark a week
//! ptl event set 1 2024-01-07 --label Draft --color "#ef4444"
//!
//! # Inspect
//! ptl list
//! ptl weeks
//! ```
//!
//! Data is stored locally in `~/.ptl/timeline.json` (override with `--db`).
//! We recommend you source control this folder via `git init` and back it up
//! periodically.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod grid;
pub mod task;
pub mod week;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod event_form;
    pub mod input;
    pub mod run;
    pub mod task_form;
}

use cli::Cli;
use cmd::*;
use db::Database;

fn main() {
    let cli = Cli::parse();

    // Completions never touch the data file.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    // Determine the database file: --db, or ~/.ptl/timeline.json.
    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let ptl_dir = PathBuf::from(home).join(".ptl");
        if let Err(e) = std::fs::create_dir_all(&ptl_dir) {
            eprintln!("Failed to create data directory {}: {}", ptl_dir.display(), e);
            std::process::exit(1);
        }
        ptl_dir.join("timeline.json")
    });

    // The UI owns its own database lifecycle.
    if let Commands::Ui = cli.command {
        cmd_ui(&db_path);
        return;
    }

    let mut db = Database::load(&db_path);

    match cli.command {
        Commands::Ui => unreachable!("UI command handled above"),
        Commands::Completions { .. } => unreachable!("completions handled above"),

        Commands::Add {
            name,
            category,
            sort_order,
        } => cmd_add(&mut db, &db_path, name, category, sort_order),

        Commands::List { category } => cmd_list(&db, category),

        Commands::Update {
            id,
            name,
            category,
            sort_order,
        } => cmd_update(&mut db, &db_path, id, name, category, sort_order),

        Commands::Delete { id } => cmd_delete(&mut db, &db_path, id),

        Commands::Event { action } => match action {
            EventAction::Set {
                task_id,
                week_date,
                label,
                color,
            } => cmd_event_set(&mut db, &db_path, task_id, week_date, label, color),
            EventAction::Clear { task_id, week_date } => {
                cmd_event_clear(&mut db, &db_path, task_id, week_date)
            }
        },

        Commands::Weeks { back, forward } => cmd_weeks(&db, back, forward),

        Commands::RenameCategory { from, to } => cmd_rename_category(&mut db, &db_path, from, to),
    }
}
