//! Task and event data structures.
//!
//! This module defines the `Task` struct representing a single trackable work
//! item on the project plan, and the `Event` struct representing a one-week
//! status marker attached to a task.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A trackable unit of work on the project plan.
///
/// Tasks carry a free-text `category` grouping label rather than a foreign key;
/// categories are derived from the distinct set of values, so renaming one
/// means rewriting the field on every task that carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub category: String,
    pub task: String,
    /// Intra-category ordering. Ties fall back to id order.
    #[serde(default)]
    pub sort_order: i64,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

/// A single calendar-cell marker: the task is "in this state" during the week
/// starting at `week_date`.
///
/// At most one event is meaningful per `(task_id, week_date)` pair; the event
/// index resolves duplicates last-write-wins and the database upserts on that
/// key so stored data stays unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub task_id: u64,
    pub week_date: NaiveDate,
    /// Short display text rendered inside the cell.
    pub label: Option<String>,
    /// Display colour as a "#rrggbb" hex string. Absent renders neutral gray.
    pub color: Option<String>,
    pub created_at_utc: i64,
}
