//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure for creating and editing
//! tasks in the TUI: a category selector over the existing categories (or a
//! typed-in new category), and a free-text task name. The form only captures
//! intent; the hosting app owns persistence and decides when to close it.

use crate::task::Task;
use crate::tui::{enums::FormMode, input::InputField};

/// Field order within the form.
pub const CATEGORY_FIELD: usize = 0;
pub const NAME_FIELD: usize = 1;
const FIELD_COUNT: usize = 2;

/// What a saved form hands back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPayload {
    pub category: String,
    pub task: String,
}

/// Task form for creating or editing one task.
pub struct TaskForm {
    pub mode: FormMode,
    /// Set in edit mode; delete intents carry this id.
    pub task_id: Option<u64>,
    pub name: InputField,
    /// Categories offered for selection. Falls back to the configured default
    /// list when the host data has none yet.
    pub categories: Vec<String>,
    pub category_index: usize,
    /// When set, the typed-in new category wins over the selector.
    pub new_category_mode: bool,
    pub new_category: InputField,
    pub current_field: usize,
}

impl TaskForm {
    /// Create-mode form: blank fields, selector over `categories` or the
    /// fallback list when none exist.
    pub fn new(categories: Vec<String>, defaults: &[String]) -> Self {
        let categories = if categories.is_empty() {
            defaults.to_vec()
        } else {
            categories
        };
        let mut form = TaskForm {
            mode: FormMode::Create,
            task_id: None,
            name: InputField::new(),
            categories,
            category_index: 0,
            new_category_mode: false,
            new_category: InputField::new(),
            current_field: CATEGORY_FIELD,
        };
        form.update_active_field();
        form
    }

    /// Edit-mode form pre-filled from an existing task.
    pub fn from_task(task: &Task, categories: Vec<String>, defaults: &[String]) -> Self {
        let mut form = Self::new(categories, defaults);
        form.mode = FormMode::Edit;
        form.task_id = Some(task.id);
        form.name = InputField::with_value(&task.task);
        match form.categories.iter().position(|c| c == &task.category) {
            Some(index) => form.category_index = index,
            None => {
                // The task's own category must always be selectable.
                form.categories.push(task.category.clone());
                form.category_index = form.categories.len() - 1;
            }
        }
        form.update_active_field();
        form
    }

    /// Title for the form popup.
    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "New Task",
            FormMode::Edit => "Edit Task",
        }
    }

    /// Whether the delete action is offered.
    pub fn can_delete(&self) -> bool {
        self.mode == FormMode::Edit && self.task_id.is_some()
    }

    /// Flip between selecting an existing category and typing a new one.
    /// The new-category text resets every time the toggle changes.
    pub fn toggle_new_category(&mut self) {
        self.new_category_mode = !self.new_category_mode;
        self.new_category.clear();
        self.current_field = CATEGORY_FIELD;
        self.update_active_field();
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Update which input field is active for editing.
    pub fn update_active_field(&mut self) {
        self.name.active = self.current_field == NAME_FIELD;
        self.new_category.active =
            self.current_field == CATEGORY_FIELD && self.new_category_mode;
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        match self.current_field {
            NAME_FIELD => self.name.handle_char(c),
            CATEGORY_FIELD if self.new_category_mode => self.new_category.handle_char(c),
            _ => {}
        }
    }

    /// Handle backspace for the currently active field.
    pub fn handle_backspace(&mut self) {
        match self.current_field {
            NAME_FIELD => self.name.handle_backspace(),
            CATEGORY_FIELD if self.new_category_mode => self.new_category.handle_backspace(),
            _ => {}
        }
    }

    /// Handle forward delete for the currently active field.
    pub fn handle_delete(&mut self) {
        match self.current_field {
            NAME_FIELD => self.name.handle_delete(),
            CATEGORY_FIELD if self.new_category_mode => self.new_category.handle_delete(),
            _ => {}
        }
    }

    /// Handle left/right arrows: cursor movement in text fields, selection
    /// cycling on the category selector.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            NAME_FIELD => {
                if right {
                    self.name.move_cursor_right()
                } else {
                    self.name.move_cursor_left()
                }
            }
            CATEGORY_FIELD if self.new_category_mode => {
                if right {
                    self.new_category.move_cursor_right()
                } else {
                    self.new_category.move_cursor_left()
                }
            }
            CATEGORY_FIELD => {
                if self.categories.is_empty() {
                    return;
                }
                if right {
                    self.category_index = (self.category_index + 1) % self.categories.len();
                } else {
                    self.category_index = if self.category_index == 0 {
                        self.categories.len() - 1
                    } else {
                        self.category_index - 1
                    };
                }
            }
            _ => {}
        }
    }

    /// The category a save would carry, if one resolves: the trimmed
    /// new-category text in new-category mode, else the selected value.
    pub fn resolved_category(&self) -> Option<String> {
        if self.new_category_mode {
            let typed = self.new_category.trimmed();
            if typed.is_empty() {
                None
            } else {
                Some(typed.to_string())
            }
        } else {
            self.categories.get(self.category_index).cloned()
        }
    }

    /// Save is allowed only with a non-empty trimmed task name and a resolved
    /// category. The invalid submit is unreachable through the UI.
    pub fn can_save(&self) -> bool {
        !self.name.trimmed().is_empty() && self.resolved_category().is_some()
    }

    /// The `{category, task}` payload for the host, or None while invalid.
    pub fn payload(&self) -> Option<TaskPayload> {
        if !self.can_save() {
            return None;
        }
        Some(TaskPayload {
            category: self.resolved_category()?,
            task: self.name.trimmed().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        vec!["Construction".to_string(), "IT".to_string()]
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

    #[test]
    fn test_create_mode_empty_name_blocks_save() {
        // No categories in host data: form offers the fallback list, but an
        // empty task name still disables save regardless of selection.
        let mut form = TaskForm::new(Vec::new(), &defaults());
        assert_eq!(form.mode, FormMode::Create);
        assert_eq!(form.categories, defaults());
        assert!(!form.can_save());
        form.handle_left_right(true);
        assert!(!form.can_save());
        assert!(form.payload().is_none());
    }

    #[test]
    fn test_whitespace_name_blocks_save() {
        let mut form = TaskForm::new(vec!["IT".to_string()], &defaults());
        form.next_field();
        for c in "   ".chars() {
            form.handle_char(c);
        }
        assert!(!form.can_save());
    }

    #[test]
    fn test_edit_mode_prefills_and_offers_delete() {
        let t = task(5, "IT", "Buy laptops");
        let form = TaskForm::from_task(&t, vec!["Hiring".to_string(), "IT".to_string()], &[]);
        assert_eq!(form.mode, FormMode::Edit);
        assert_eq!(form.title(), "Edit Task");
        assert_eq!(form.categories[form.category_index], "IT");
        assert_eq!(form.name.value, "Buy laptops");
        assert!(form.can_delete());
        assert_eq!(form.task_id, Some(5));
    }

    #[test]
    fn test_edit_mode_keeps_unknown_category_selectable() {
        let t = task(5, "Security", "Add cameras");
        let form = TaskForm::from_task(&t, vec!["IT".to_string()], &[]);
        assert_eq!(form.categories[form.category_index], "Security");
    }

    #[test]
    fn test_new_category_save_payload() {
        // User flips to new-category mode, types "Security", names the task.
        let mut form = TaskForm::new(vec!["IT".to_string()], &defaults());
        form.toggle_new_category();
        for c in "Security".chars() {
            form.handle_char(c);
        }
        form.next_field();
        for c in "Add cameras".chars() {
            form.handle_char(c);
        }
        assert_eq!(
            form.payload(),
            Some(TaskPayload {
                category: "Security".to_string(),
                task: "Add cameras".to_string(),
            })
        );
    }

    #[test]
    fn test_new_category_empty_blocks_save() {
        let mut form = TaskForm::new(vec!["IT".to_string()], &defaults());
        form.toggle_new_category();
        form.next_field();
        for c in "Add cameras".chars() {
            form.handle_char(c);
        }
        // Name is fine but the new-category text is blank.
        assert!(!form.can_save());
    }

    #[test]
    fn test_toggle_resets_new_category_text() {
        let mut form = TaskForm::new(vec!["IT".to_string()], &defaults());
        form.toggle_new_category();
        for c in "Security".chars() {
            form.handle_char(c);
        }
        form.toggle_new_category();
        form.toggle_new_category();
        assert_eq!(form.new_category.value, "");
        assert!(form.new_category_mode);
    }

    #[test]
    fn test_selector_wraps() {
        let mut form = TaskForm::new(vec!["A".to_string(), "B".to_string()], &[]);
        form.handle_left_right(false);
        assert_eq!(form.category_index, 1);
        form.handle_left_right(true);
        assert_eq!(form.category_index, 0);
    }
}
