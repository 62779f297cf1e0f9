//! Database operations and table-print helpers for the timeline.
//!
//! This module provides the `Database` struct holding the task and event
//! tables plus per-file settings, with JSON load/save and the small mutation
//! surface the CLI and TUI share: id allocation, event upserts, cascade
//! deletes, and category renames.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::grid::CategoryGroups;
use crate::task::{Event, Task};
use crate::week;

/// Per-file settings for the timeline view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Weeks of axis to show before the current week.
    #[serde(default = "default_weeks_back")]
    pub weeks_back: u32,
    /// Weeks of axis to show after the current week.
    #[serde(default = "default_weeks_forward")]
    pub weeks_forward: u32,
    /// Categories offered by the task form when no tasks exist yet.
    /// Purely a usability affordance; nothing is persisted until a save.
    #[serde(default = "default_categories")]
    pub default_categories: Vec<String>,
}

fn default_weeks_back() -> u32 {
    4
}

fn default_weeks_forward() -> u32 {
    12
}

fn default_categories() -> Vec<String> {
    [
        "Construction",
        "Permits",
        "Hiring",
        "IT",
        "Marketing",
        "Operations",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            weeks_back: default_weeks_back(),
            weeks_forward: default_weeks_forward(),
            default_categories: default_categories(),
        }
    }
}

/// In-memory database for storing tasks and their week events.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub settings: Settings,
}

impl Database {
    /// Load database from JSON file, creating a new empty database if the file
    /// doesn't exist. Parse and read failures degrade to an empty database so
    /// the grid can still render.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Database::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("Error parsing DB, starting fresh: {e}");
                    Database::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading DB, starting fresh: {e}");
                Database::default()
            }
        }
    }

    /// Save database to JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available task ID.
    pub fn next_task_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Generate the next available event ID.
    pub fn next_event_id(&self) -> u64 {
        self.events.iter().map(|e| e.id).max().unwrap_or(0) + 1
    }

    /// Get a task by ID.
    pub fn get_task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_task_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Create a task and return its new ID.
    pub fn add_task(&mut self, category: &str, name: &str, sort_order: i64) -> u64 {
        let id = self.next_task_id();
        let now = Utc::now().timestamp();
        self.tasks.push(Task {
            id,
            category: category.to_string(),
            task: name.to_string(),
            sort_order,
            created_at_utc: now,
            updated_at_utc: now,
        });
        id
    }

    /// Remove a task and cascade-delete its events. Returns true if it existed.
    pub fn remove_task(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        // Events are owned by their task; orphans would render nowhere.
        self.events.retain(|e| e.task_id != id);
        true
    }

    /// Create or update the event at `(task_id, week_date)`.
    ///
    /// The stored table keeps at most one row per key; a second set on the same
    /// key overwrites label and colour in place, matching the index's
    /// last-write-wins semantics.
    pub fn upsert_event(
        &mut self,
        task_id: u64,
        week_date: NaiveDate,
        label: Option<String>,
        color: Option<String>,
    ) -> u64 {
        if let Some(e) = self
            .events
            .iter_mut()
            .find(|e| e.task_id == task_id && e.week_date == week_date)
        {
            e.label = label;
            e.color = color;
            return e.id;
        }
        let id = self.next_event_id();
        self.events.push(Event {
            id,
            task_id,
            week_date,
            label,
            color,
            created_at_utc: Utc::now().timestamp(),
        });
        id
    }

    /// Remove the event at `(task_id, week_date)`. Returns true if one existed.
    pub fn clear_event(&mut self, task_id: u64, week_date: NaiveDate) -> bool {
        let before = self.events.len();
        self.events
            .retain(|e| !(e.task_id == task_id && e.week_date == week_date));
        self.events.len() != before
    }

    /// Rewrite `category` on every task carrying `from`. Returns the number of
    /// tasks touched. Categories are derived, not declared, so a rename is a
    /// bulk field rewrite.
    pub fn rename_category(&mut self, from: &str, to: &str) -> usize {
        let now = Utc::now().timestamp();
        let mut touched = 0;
        for t in self.tasks.iter_mut() {
            if t.category == from {
                t.category = to.to_string();
                t.updated_at_utc = now;
                touched += 1;
            }
        }
        touched
    }

    /// The week-date axis configured for this database, centred on today.
    pub fn week_axis(&self) -> Vec<NaiveDate> {
        week::week_axis(
            Local::now().date_naive(),
            self.settings.weeks_back,
            self.settings.weeks_forward,
        )
    }
}

/// Print tasks grouped by category in a formatted table.
pub fn print_table(db: &Database, category: Option<&str>) {
    let groups = CategoryGroups::build(&db.tasks);
    println!("{:<5} {:<16} {:<8} {}", "ID", "Category", "Events", "Task");
    for name in groups.sorted_categories() {
        if let Some(filter) = category {
            if name != filter {
                continue;
            }
        }
        for t in groups.tasks_in(name) {
            let events = db.events.iter().filter(|e| e.task_id == t.id).count();
            println!(
                "{:<5} {:<16} {:<8} {}",
                t.id,
                truncate(name, 16),
                events,
                t.task
            );
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_upsert_keeps_one_row_per_key() {
        let mut db = Database::default();
        let task = db.add_task("IT", "Buy laptops", 0);
        db.upsert_event(task, d("2024-01-07"), Some("Order".into()), None);
        db.upsert_event(
            task,
            d("2024-01-07"),
            Some("Delivered".into()),
            Some("#22c55e".into()),
        );
        assert_eq!(db.events.len(), 1);
        assert_eq!(db.events[0].label.as_deref(), Some("Delivered"));
        assert_eq!(db.events[0].color.as_deref(), Some("#22c55e"));
    }

    #[test]
    fn test_remove_task_cascades_events() {
        let mut db = Database::default();
        let a = db.add_task("IT", "Buy laptops", 0);
        let b = db.add_task("IT", "Set up wifi", 0);
        db.upsert_event(a, d("2024-01-07"), None, None);
        db.upsert_event(b, d("2024-01-07"), None, None);
        assert!(db.remove_task(a));
        assert_eq!(db.tasks.len(), 1);
        assert_eq!(db.events.len(), 1);
        assert_eq!(db.events[0].task_id, b);
        assert!(!db.remove_task(a));
    }

    #[test]
    fn test_clear_event() {
        let mut db = Database::default();
        let task = db.add_task("IT", "Buy laptops", 0);
        db.upsert_event(task, d("2024-01-07"), None, None);
        assert!(db.clear_event(task, d("2024-01-07")));
        assert!(!db.clear_event(task, d("2024-01-07")));
        assert!(db.events.is_empty());
    }

    #[test]
    fn test_rename_category_rewrites_every_carrier() {
        let mut db = Database::default();
        db.add_task("IT", "Buy laptops", 0);
        db.add_task("IT", "Set up wifi", 0);
        db.add_task("Hiring", "Post JD", 0);
        assert_eq!(db.rename_category("IT", "Technology"), 2);
        assert!(db.tasks.iter().all(|t| t.category != "IT"));
        assert_eq!(db.rename_category("IT", "Technology"), 0);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut db = Database::default();
        let a = db.add_task("IT", "One", 0);
        let b = db.add_task("IT", "Two", 0);
        assert!(b > a);
        db.remove_task(b);
        // Ids never dip below the live maximum.
        let c = db.add_task("IT", "Three", 0);
        assert!(c > a);
    }
}
