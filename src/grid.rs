//! Pure timeline-grid model: event index, category grouping, row layout.
//!
//! Everything here is a deterministic function of a `(tasks, events)` snapshot
//! plus caller-owned view state (the collapsed-category set, the one-shot
//! scroll intent). Nothing is mutated incrementally; the TUI rebuilds these
//! structures on every data change, which keeps the grid testable without a
//! terminal harness.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use crate::task::{Event, Task};
use crate::week;

/// Lookup structure mapping `(task_id, week_date)` to at most one event.
///
/// Built from a flat event list in iteration order; for duplicate keys the
/// last event wins, silently. Upstream data should be unique on the key, but
/// last-write-wins display semantics are the documented fallback when it
/// isn't, so this must stay overwrite-on-insert.
#[derive(Debug, Default)]
pub struct EventIndex {
    map: HashMap<(u64, NaiveDate), Event>,
}

impl EventIndex {
    /// Build the index from an event list. Never mutated afterwards; rebuild
    /// whenever the source list changes.
    pub fn build(events: &[Event]) -> Self {
        let mut map = HashMap::with_capacity(events.len());
        for e in events {
            map.insert((e.task_id, e.week_date), e.clone());
        }
        EventIndex { map }
    }

    /// The event at `(task_id, week_date)`, if any. Absence renders as an
    /// empty, clickable cell.
    pub fn get(&self, task_id: u64, week_date: NaiveDate) -> Option<&Event> {
        self.map.get(&(task_id, week_date))
    }

    /// Number of distinct `(task, week)` cells holding an event.
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

/// Tasks partitioned by category name, with deterministic ordering.
#[derive(Debug, Default)]
pub struct CategoryGroups {
    groups: BTreeMap<String, Vec<Task>>,
}

impl CategoryGroups {
    /// Group tasks by category. Intra-category order is `(sort_order, id)`,
    /// which is stable for identical inputs.
    pub fn build(tasks: &[Task]) -> Self {
        let mut groups: BTreeMap<String, Vec<Task>> = BTreeMap::new();
        for t in tasks {
            groups.entry(t.category.clone()).or_default().push(t.clone());
        }
        for list in groups.values_mut() {
            list.sort_by_key(|t| (t.sort_order, t.id));
        }
        CategoryGroups { groups }
    }

    /// Category names in ascending lexicographic order.
    pub fn sorted_categories(&self) -> Vec<&str> {
        self.groups.keys().map(|s| s.as_str()).collect()
    }

    /// Tasks in one category, in display order.
    pub fn tasks_in(&self, category: &str) -> &[Task] {
        self.groups.get(category).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Flip membership of `category` in the collapsed set. Affects rendering only;
/// the underlying tasks are untouched. Its own inverse.
pub fn toggle_category(collapsed: &mut HashSet<String>, category: &str) {
    if !collapsed.remove(category) {
        collapsed.insert(category.to_string());
    }
}

/// One display row of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridRow {
    /// Collapsible category header showing name and task count.
    Category {
        name: String,
        count: usize,
        collapsed: bool,
    },
    /// One task row; cells are resolved against the event index per column.
    Task { id: u64 },
}

/// Lay out the visible rows: each category header, followed by its task rows
/// unless collapsed. Pure function of the groups and the collapsed set.
pub fn visible_rows(groups: &CategoryGroups, collapsed: &HashSet<String>) -> Vec<GridRow> {
    let mut rows = Vec::new();
    for name in groups.sorted_categories() {
        let tasks = groups.tasks_in(name);
        let is_collapsed = collapsed.contains(name);
        rows.push(GridRow::Category {
            name: name.to_string(),
            count: tasks.len(),
            collapsed: is_collapsed,
        });
        if !is_collapsed {
            for t in tasks {
                rows.push(GridRow::Task { id: t.id });
            }
        }
    }
    rows
}

/// One-shot auto-scroll state for aligning the current week on first display.
///
/// Tri-state rather than a boolean so "already scrolled, do nothing" and
/// "tried but the axis has no current week" stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollIntent {
    NotAttempted,
    /// Scrolled to this column offset on first display.
    Scrolled(usize),
    /// The axis contains no current-week column; nothing to align to.
    NoCurrentWeek,
}

impl ScrollIntent {
    /// Resolve the initial column offset: the current-week column minus two,
    /// so the current week sits near the left edge with context before it.
    ///
    /// Returns `Some(offset)` exactly once; later calls are no-ops regardless
    /// of outcome.
    pub fn attempt(&mut self, week_dates: &[NaiveDate], today: NaiveDate) -> Option<usize> {
        if *self != ScrollIntent::NotAttempted {
            return None;
        }
        match week_dates
            .iter()
            .position(|&d| week::is_current_week(d, today))
        {
            Some(col) => {
                let offset = col.saturating_sub(2);
                *self = ScrollIntent::Scrolled(offset);
                Some(offset)
            }
            None => {
                *self = ScrollIntent::NoCurrentWeek;
                None
            }
        }
    }
}

/// The task/event snapshot currently backing the rendered view.
///
/// Refreshes carry a monotonically increasing generation; an out-of-order
/// completion (an older fetch landing after a newer one) is dropped so the
/// view is last-write-wins and never shows stale data.
#[derive(Debug, Default)]
pub struct ViewData {
    pub tasks: Vec<Task>,
    pub events: Vec<Event>,
    generation: u64,
}

impl ViewData {
    /// Apply a snapshot if it is at least as new as the latest applied.
    /// Returns false when the snapshot was stale and dropped.
    pub fn apply(&mut self, tasks: Vec<Task>, events: Vec<Event>, generation: u64) -> bool {
        if generation < self.generation {
            return false;
        }
        self.tasks = tasks;
        self.events = events;
        self.generation = generation;
        true
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: u64, category: &str, name: &str) -> Task {
        Task {
            id,
            category: category.to_string(),
            task: name.to_string(),
            sort_order: 0,
            created_at_utc: 0,
            updated_at_utc: 0,
        }
    }

    fn event(task_id: u64, week_date: &str, label: &str, color: Option<&str>) -> Event {
        Event {
            id: 0,
            task_id,
            week_date: d(week_date),
            label: Some(label.to_string()),
            color: color.map(|c| c.to_string()),
            created_at_utc: Utc::now().timestamp(),
        }
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let events = vec![
            event(1, "2024-01-01", "Draft", None),
            event(1, "2024-01-01", "Final", Some("#22c55e")),
        ];
        let index = EventIndex::build(&events);
        assert_eq!(index.len(), 1);
        let hit = index.get(1, d("2024-01-01")).unwrap();
        assert_eq!(hit.label.as_deref(), Some("Final"));
        assert_eq!(hit.color.as_deref(), Some("#22c55e"));
    }

    #[test]
    fn test_index_lookup_absent() {
        let index = EventIndex::build(&[event(1, "2024-01-01", "Draft", None)]);
        assert!(index.get(1, d("2024-01-08")).is_none());
        assert!(index.get(2, d("2024-01-01")).is_none());
    }

    #[test]
    fn test_sorted_categories_lexicographic_and_idempotent() {
        let tasks = vec![
            task(1, "IT", "Buy laptops"),
            task(2, "Hiring", "Post JD"),
            task(3, "Construction", "Pour slab"),
        ];
        let groups = CategoryGroups::build(&tasks);
        let first = groups.sorted_categories();
        assert_eq!(first, vec!["Construction", "Hiring", "IT"]);
        // Sorting twice yields the same sequence.
        assert_eq!(groups.sorted_categories(), first);
    }

    #[test]
    fn test_intra_category_order_is_sort_order_then_id() {
        let mut a = task(5, "IT", "Later");
        a.sort_order = 2;
        let b = task(9, "IT", "First");
        let c = task(3, "IT", "Also first");
        let groups = CategoryGroups::build(&[a, b, c]);
        let ids: Vec<u64> = groups.tasks_in("IT").iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 9, 5]);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut collapsed = HashSet::new();
        toggle_category(&mut collapsed, "IT");
        assert!(collapsed.contains("IT"));
        toggle_category(&mut collapsed, "IT");
        assert!(collapsed.is_empty());
    }

    #[test]
    fn test_visible_rows_two_categories() {
        // Categories Hiring and IT, one task each, nothing collapsed: two
        // header rows in order with one task row under each.
        let tasks = vec![task(1, "Hiring", "Post JD"), task(2, "IT", "Buy laptops")];
        let groups = CategoryGroups::build(&tasks);
        let rows = visible_rows(&groups, &HashSet::new());
        assert_eq!(
            rows,
            vec![
                GridRow::Category {
                    name: "Hiring".into(),
                    count: 1,
                    collapsed: false
                },
                GridRow::Task { id: 1 },
                GridRow::Category {
                    name: "IT".into(),
                    count: 1,
                    collapsed: false
                },
                GridRow::Task { id: 2 },
            ]
        );
    }

    #[test]
    fn test_visible_rows_collapse_hides_tasks_only() {
        let tasks = vec![task(1, "Hiring", "Post JD"), task(2, "IT", "Buy laptops")];
        let groups = CategoryGroups::build(&tasks);
        let mut collapsed = HashSet::new();
        toggle_category(&mut collapsed, "Hiring");
        let rows = visible_rows(&groups, &collapsed);
        assert_eq!(
            rows,
            vec![
                GridRow::Category {
                    name: "Hiring".into(),
                    count: 1,
                    collapsed: true
                },
                GridRow::Category {
                    name: "IT".into(),
                    count: 1,
                    collapsed: false
                },
                GridRow::Task { id: 2 },
            ]
        );
        // Underlying data is untouched.
        assert_eq!(groups.tasks_in("Hiring").len(), 1);
    }

    #[test]
    fn test_cell_resolution_scenario() {
        // One red "Draft" cell at (task 1, 2024-01-01); every other cell empty.
        let events = vec![event(1, "2024-01-01", "Draft", Some("#ff0000"))];
        let index = EventIndex::build(&events);
        let axis = [d("2024-01-01"), d("2024-01-08")];
        let hit = index.get(1, axis[0]).unwrap();
        assert_eq!(hit.label.as_deref(), Some("Draft"));
        assert_eq!(hit.color.as_deref(), Some("#ff0000"));
        assert!(index.get(1, axis[1]).is_none());
        assert!(index.get(2, axis[0]).is_none());
        assert!(index.get(2, axis[1]).is_none());
    }

    #[test]
    fn test_scroll_intent_fires_once() {
        let today = d("2024-02-07");
        let axis = week::week_axis(today, 4, 4);
        let mut intent = ScrollIntent::NotAttempted;
        // Current week is column 4; offset lands two columns earlier.
        assert_eq!(intent.attempt(&axis, today), Some(2));
        assert_eq!(intent, ScrollIntent::Scrolled(2));
        // Re-renders must not re-trigger the scroll.
        assert_eq!(intent.attempt(&axis, today), None);
    }

    #[test]
    fn test_scroll_intent_near_left_edge() {
        let today = d("2024-02-07");
        let axis = week::week_axis(today, 1, 4);
        let mut intent = ScrollIntent::NotAttempted;
        assert_eq!(intent.attempt(&axis, today), Some(0));
    }

    #[test]
    fn test_scroll_intent_no_current_week() {
        let today = d("2024-02-07");
        let axis = [d("2023-01-01"), d("2023-01-08")];
        let mut intent = ScrollIntent::NotAttempted;
        assert_eq!(intent.attempt(&axis, today), None);
        assert_eq!(intent, ScrollIntent::NoCurrentWeek);
        // Still a no-op afterwards, even with a usable axis.
        let usable = week::week_axis(today, 4, 4);
        assert_eq!(intent.attempt(&usable, today), None);
    }

    #[test]
    fn test_stale_snapshot_dropped() {
        let mut view = ViewData::default();
        assert!(view.apply(vec![task(1, "IT", "New")], vec![], 2));
        // An older fetch completing late must not clobber the newer data.
        assert!(!view.apply(vec![task(9, "IT", "Stale")], vec![], 1));
        assert_eq!(view.tasks[0].id, 1);
        assert_eq!(view.generation(), 2);
        assert!(view.apply(vec![], vec![], 3));
        assert!(view.tasks.is_empty());
    }
}
