//! Event cell editor for the terminal user interface.
//!
//! Modal scoped to one `(task, week)` coordinate: an optional label and a
//! colour picked from a fixed palette. Opened pre-filled when the cell already
//! holds an event; the hosting app owns the upsert/delete.

use chrono::NaiveDate;

use crate::task::Event;
use crate::tui::{colors::PALETTE, enums::FormMode, input::InputField};

/// Field order within the form.
pub const LABEL_FIELD: usize = 0;
pub const COLOR_FIELD: usize = 1;
const FIELD_COUNT: usize = 2;

/// What a saved cell editor hands back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPayload {
    pub label: Option<String>,
    pub color: Option<String>,
}

/// Editor for the event at one grid cell.
pub struct EventForm {
    pub mode: FormMode,
    pub task_id: u64,
    pub week_date: NaiveDate,
    pub label: InputField,
    /// Index into the colour choices; 0 is "none" (neutral gray).
    pub color_index: usize,
    pub current_field: usize,
}

impl EventForm {
    /// Open the editor for `(task_id, week_date)`, pre-filled from `existing`
    /// when the cell already holds an event.
    pub fn open(task_id: u64, week_date: NaiveDate, existing: Option<&Event>) -> Self {
        let mut form = EventForm {
            mode: if existing.is_some() {
                FormMode::Edit
            } else {
                FormMode::Create
            },
            task_id,
            week_date,
            label: InputField::new(),
            color_index: 0,
            current_field: LABEL_FIELD,
        };
        if let Some(event) = existing {
            form.label = InputField::with_value(event.label.as_deref().unwrap_or(""));
            if let Some(ref stored) = event.color {
                form.color_index = PALETTE
                    .iter()
                    .position(|(_, hex)| hex == stored)
                    .map(|i| i + 1)
                    .unwrap_or(0);
            }
        }
        form.label.active = true;
        form
    }

    /// Display names for the colour choices, "None" first.
    pub fn color_name(&self) -> &'static str {
        if self.color_index == 0 {
            "None"
        } else {
            PALETTE[self.color_index - 1].0
        }
    }

    /// The hex string a save would store, if any.
    pub fn color_hex(&self) -> Option<&'static str> {
        if self.color_index == 0 {
            None
        } else {
            Some(PALETTE[self.color_index - 1].1)
        }
    }

    /// Whether the delete action is offered (existing events only).
    pub fn can_delete(&self) -> bool {
        self.mode == FormMode::Edit
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.label.active = self.current_field == LABEL_FIELD;
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.label.active = self.current_field == LABEL_FIELD;
    }

    /// Handle character input for the label field.
    pub fn handle_char(&mut self, c: char) {
        if self.current_field == LABEL_FIELD {
            self.label.handle_char(c);
        }
    }

    /// Handle backspace for the label field.
    pub fn handle_backspace(&mut self) {
        if self.current_field == LABEL_FIELD {
            self.label.handle_backspace();
        }
    }

    /// Handle forward delete for the label field.
    pub fn handle_delete(&mut self) {
        if self.current_field == LABEL_FIELD {
            self.label.handle_delete();
        }
    }

    /// Handle left/right arrows: cursor movement on the label, cycling on the
    /// colour selector.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            LABEL_FIELD => {
                if right {
                    self.label.move_cursor_right()
                } else {
                    self.label.move_cursor_left()
                }
            }
            COLOR_FIELD => {
                let choices = PALETTE.len() + 1;
                if right {
                    self.color_index = (self.color_index + 1) % choices;
                } else {
                    self.color_index = if self.color_index == 0 {
                        choices - 1
                    } else {
                        self.color_index - 1
                    };
                }
            }
            _ => {}
        }
    }

    /// The payload for the host. A blank label stores as absent; the label is
    /// optional, so the editor is always saveable.
    pub fn payload(&self) -> EventPayload {
        let label = self.label.trimmed();
        EventPayload {
            label: if label.is_empty() {
                None
            } else {
                Some(label.to_string())
            },
            color: self.color_hex().map(|s| s.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn event(label: Option<&str>, color: Option<&str>) -> Event {
        Event {
            id: 1,
            task_id: 1,
            week_date: d("2024-01-07"),
            label: label.map(|s| s.to_string()),
            color: color.map(|s| s.to_string()),
            created_at_utc: 0,
        }
    }

    #[test]
    fn test_open_blank_cell() {
        let form = EventForm::open(1, d("2024-01-07"), None);
        assert_eq!(form.mode, FormMode::Create);
        assert!(!form.can_delete());
        assert_eq!(form.color_name(), "None");
        assert_eq!(
            form.payload(),
            EventPayload {
                label: None,
                color: None
            }
        );
    }

    #[test]
    fn test_open_prefills_existing_event() {
        let e = event(Some("Draft"), Some("#22c55e"));
        let form = EventForm::open(1, d("2024-01-07"), Some(&e));
        assert_eq!(form.mode, FormMode::Edit);
        assert!(form.can_delete());
        assert_eq!(form.label.value, "Draft");
        assert_eq!(form.color_name(), "Green");
        assert_eq!(form.color_hex(), Some("#22c55e"));
    }

    #[test]
    fn test_unknown_stored_color_falls_back_to_none() {
        let e = event(None, Some("#123456"));
        let form = EventForm::open(1, d("2024-01-07"), Some(&e));
        assert_eq!(form.color_index, 0);
    }

    #[test]
    fn test_color_cycle_wraps() {
        let mut form = EventForm::open(1, d("2024-01-07"), None);
        form.next_field();
        form.handle_left_right(false);
        assert_eq!(form.color_index, PALETTE.len());
        form.handle_left_right(true);
        assert_eq!(form.color_index, 0);
    }

    #[test]
    fn test_payload_trims_label() {
        let mut form = EventForm::open(1, d("2024-01-07"), None);
        for c in "  Draft  ".chars() {
            form.handle_char(c);
        }
        form.next_field();
        form.handle_left_right(true);
        let payload = form.payload();
        assert_eq!(payload.label.as_deref(), Some("Draft"));
        assert_eq!(payload.color.as_deref(), Some("#ef4444"));
    }
}
