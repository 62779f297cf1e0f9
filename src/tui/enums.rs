//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    Grid,
    TaskForm,
    EventForm,
    Confirm,
    Help,
}

/// Whether a form was opened blank or pre-filled from an existing record.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FormMode {
    Create,
    Edit,
}
