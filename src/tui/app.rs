//! Timeline grid terminal user interface.
//!
//! This module implements the week-by-week grid view: category header rows,
//! task rows, and one cell per week date, with collapse/expand, a one-shot
//! auto-scroll to the current week, and modal editors for tasks and cell
//! events. All grid computation is delegated to the pure model in
//! [`crate::grid`]; this type owns only ephemeral view state and persistence.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::db::{truncate, Database};
use crate::grid::{
    toggle_category, visible_rows, CategoryGroups, EventIndex, GridRow, ScrollIntent, ViewData,
};
use crate::task::Task;
use crate::tui::colors::{self, CATEGORY_BAR, CURRENT_WEEK, PAST_WEEK};
use crate::tui::enums::AppState;
use crate::tui::event_form::EventForm;
use crate::tui::task_form::TaskForm;
use crate::week;

/// Width of the fixed task-label column.
const LABEL_WIDTH: u16 = 26;
/// Width of one week-date cell.
const CELL_WIDTH: u16 = 12;

/// Pending destructive action awaiting confirmation.
#[derive(Clone, Copy)]
enum ConfirmAction {
    DeleteTask(u64),
    DeleteEvent { task_id: u64, week_date: NaiveDate },
}

/// Main timeline application state.
pub struct App {
    state: AppState,
    db: Database,
    db_path: PathBuf,
    view: ViewData,
    index: EventIndex,
    groups: CategoryGroups,
    rows: Vec<GridRow>,
    week_dates: Vec<NaiveDate>,
    collapsed: HashSet<String>,
    selected_row: usize,
    /// 0 is the task-name column; 1..=week count are date cells.
    selected_col: usize,
    row_offset: usize,
    col_offset: usize,
    scroll_intent: ScrollIntent,
    task_form: Option<TaskForm>,
    event_form: Option<EventForm>,
    confirm: Option<ConfirmAction>,
    status_message: String,
}

impl App {
    /// Create a new App instance, loading the database from the specified path.
    pub fn new(db_path: &Path) -> io::Result<Self> {
        let db = Database::load(db_path);
        let week_dates = db.week_axis();

        let mut app = App {
            state: AppState::Grid,
            db,
            db_path: db_path.to_path_buf(),
            view: ViewData::default(),
            index: EventIndex::default(),
            groups: CategoryGroups::default(),
            rows: Vec::new(),
            week_dates,
            collapsed: HashSet::new(),
            selected_row: 0,
            selected_col: 0,
            row_offset: 0,
            col_offset: 0,
            scroll_intent: ScrollIntent::NotAttempted,
            task_form: None,
            event_form: None,
            confirm: None,
            status_message: String::new(),
        };

        // One-shot horizontal alignment: current week two columns from the
        // left edge. Never re-fires on later refreshes.
        if let Some(offset) = app
            .scroll_intent
            .attempt(&app.week_dates, Local::now().date_naive())
        {
            app.col_offset = offset;
        }

        app.refresh_view();
        Ok(app)
    }

    /// Rebuild the derived view (index, groups, rows) from the database.
    /// The generation guard drops out-of-order snapshots.
    fn refresh_view(&mut self) {
        let generation = self.view.generation() + 1;
        self.view
            .apply(self.db.tasks.clone(), self.db.events.clone(), generation);
        self.index = EventIndex::build(&self.view.events);
        self.groups = CategoryGroups::build(&self.view.tasks);
        self.rows = visible_rows(&self.groups, &self.collapsed);
        self.clamp_selection();
    }

    /// Save the database to disk and refresh the derived view.
    fn save_db(&mut self) -> io::Result<()> {
        self.db.save(&self.db_path)?;
        self.refresh_view();
        Ok(())
    }

    /// Keep the selection inside the current row/column bounds.
    fn clamp_selection(&mut self) {
        if self.rows.is_empty() {
            self.selected_row = 0;
        } else if self.selected_row >= self.rows.len() {
            self.selected_row = self.rows.len() - 1;
        }
        if self.selected_col > self.week_dates.len() {
            self.selected_col = self.week_dates.len();
        }
    }

    /// Distinct category names currently in the data, sorted.
    fn category_names(&self) -> Vec<String> {
        self.groups
            .sorted_categories()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// The task under the cursor, when the selected row is a task row.
    fn selected_task(&self) -> Option<&Task> {
        match self.rows.get(self.selected_row) {
            Some(GridRow::Task { id }) => self.view.tasks.iter().find(|t| t.id == *id),
            _ => None,
        }
    }

    /// Open the task form in create mode.
    fn open_create_task(&mut self) {
        self.task_form = Some(TaskForm::new(
            self.category_names(),
            &self.db.settings.default_categories,
        ));
        self.state = AppState::TaskForm;
        self.clear_status_message();
    }

    /// Open the task form pre-filled from the selected task.
    fn open_edit_task(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        let form = TaskForm::from_task(
            &task,
            self.category_names(),
            &self.db.settings.default_categories,
        );
        self.task_form = Some(form);
        self.state = AppState::TaskForm;
        self.clear_status_message();
    }

    /// Open the event editor for the selected cell, pre-filled when the cell
    /// already holds an event.
    fn open_event_form(&mut self) {
        let Some(task_id) = self.selected_task().map(|t| t.id) else {
            return;
        };
        if self.selected_col == 0 {
            return;
        }
        let week_date = self.week_dates[self.selected_col - 1];
        let form = EventForm::open(task_id, week_date, self.index.get(task_id, week_date));
        self.event_form = Some(form);
        self.state = AppState::EventForm;
        self.clear_status_message();
    }

    /// Enter on the grid: toggle a category, edit a task, or edit a cell.
    fn activate_selection(&mut self) {
        match self.rows.get(self.selected_row).cloned() {
            Some(GridRow::Category { name, .. }) => {
                // Toggles rendering state only; task data is untouched.
                toggle_category(&mut self.collapsed, &name);
                self.rows = visible_rows(&self.groups, &self.collapsed);
                self.clamp_selection();
            }
            Some(GridRow::Task { .. }) => {
                if self.selected_col == 0 {
                    self.open_edit_task();
                } else {
                    self.open_event_form();
                }
            }
            None => {}
        }
    }

    /// Apply a task-form save. On failure the form stays open with input
    /// intact so the user can retry or cancel.
    fn save_task_form(&mut self) {
        let Some(form) = self.task_form.as_ref() else {
            return;
        };
        let Some(payload) = form.payload() else {
            self.set_status_message("Task name and category are required".to_string());
            return;
        };
        match form.task_id {
            Some(id) => {
                if let Some(task) = self.db.get_task_mut(id) {
                    task.category = payload.category;
                    task.task = payload.task;
                    task.updated_at_utc = chrono::Utc::now().timestamp();
                }
            }
            None => {
                self.db.add_task(&payload.category, &payload.task, 0);
            }
        }
        match self.save_db() {
            Ok(()) => {
                self.task_form = None;
                self.state = AppState::Grid;
                self.set_status_message("Task saved".to_string());
            }
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    /// Apply an event-form save (upsert at the cell's coordinate).
    fn save_event_form(&mut self) {
        let Some(form) = self.event_form.as_ref() else {
            return;
        };
        let payload = form.payload();
        self.db
            .upsert_event(form.task_id, form.week_date, payload.label, payload.color);
        match self.save_db() {
            Ok(()) => {
                self.event_form = None;
                self.state = AppState::Grid;
                self.set_status_message("Event saved".to_string());
            }
            Err(e) => self.set_status_message(format!("Error saving: {e}")),
        }
    }

    /// Run a confirmed destructive action.
    fn apply_confirm(&mut self) {
        match self.confirm.take() {
            Some(ConfirmAction::DeleteTask(id)) => {
                self.db.remove_task(id);
                match self.save_db() {
                    Ok(()) => {
                        self.task_form = None;
                        self.state = AppState::Grid;
                        self.set_status_message("Task deleted".to_string());
                    }
                    Err(e) => {
                        self.state = AppState::Grid;
                        self.set_status_message(format!("Error saving: {e}"));
                    }
                }
            }
            Some(ConfirmAction::DeleteEvent { task_id, week_date }) => {
                self.db.clear_event(task_id, week_date);
                match self.save_db() {
                    Ok(()) => {
                        self.event_form = None;
                        self.state = AppState::Grid;
                        self.set_status_message("Event deleted".to_string());
                    }
                    Err(e) => {
                        self.state = AppState::Grid;
                        self.set_status_message(format!("Error saving: {e}"));
                    }
                }
            }
            None => self.state = AppState::Grid,
        }
    }

    /// Handle keyboard input. Returns true when the app should exit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let TermEvent::Key(key) = event::read()? {
                match self.state {
                    AppState::Grid => return Ok(self.handle_grid_input(key.code, key.modifiers)),
                    AppState::TaskForm => self.handle_task_form_input(key.code, key.modifiers),
                    AppState::EventForm => self.handle_event_form_input(key.code, key.modifiers),
                    AppState::Confirm => self.handle_confirm_input(key.code),
                    AppState::Help => self.state = AppState::Grid,
                }
            }
        }
        Ok(false)
    }

    fn handle_grid_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Up => {
                self.clear_status_message();
                if self.selected_row > 0 {
                    self.selected_row -= 1;
                }
            }
            KeyCode::Down => {
                self.clear_status_message();
                if !self.rows.is_empty() && self.selected_row < self.rows.len() - 1 {
                    self.selected_row += 1;
                }
            }
            KeyCode::Left => {
                if self.selected_col > 0 {
                    self.selected_col -= 1;
                }
            }
            KeyCode::Right => {
                if self.selected_col < self.week_dates.len() {
                    self.selected_col += 1;
                }
            }
            KeyCode::Home => self.selected_col = 0,
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_selection(),
            KeyCode::Char('a') => self.open_create_task(),
            KeyCode::Char('e') => {
                if self.selected_task().is_some() {
                    self.open_edit_task();
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    self.confirm = Some(ConfirmAction::DeleteTask(task.id));
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('h') => self.state = AppState::Help,
            KeyCode::Char('r') => {
                // Reload from disk, e.g. after an external CLI edit.
                self.db = Database::load(&self.db_path);
                self.refresh_view();
                self.set_status_message("Reloaded".to_string());
            }
            _ => {}
        }
        false
    }

    fn handle_task_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => {
                // Cancel closes without emitting anything.
                self.task_form = None;
                self.state = AppState::Grid;
                self.clear_status_message();
            }
            KeyCode::Enter => self.save_task_form(),
            KeyCode::Char('n') if modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(form) = self.task_form.as_mut() {
                    form.toggle_new_category();
                }
            }
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(form) = self.task_form.as_ref() {
                    if form.can_delete() {
                        if let Some(id) = form.task_id {
                            self.confirm = Some(ConfirmAction::DeleteTask(id));
                            self.state = AppState::Confirm;
                        }
                    }
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.task_form.as_mut() {
                    form.next_field();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.task_form.as_mut() {
                    form.prev_field();
                }
            }
            KeyCode::Left => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_left_right(false);
                }
            }
            KeyCode::Right => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_left_right(true);
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_delete();
                }
            }
            KeyCode::Char(c) => {
                if let Some(form) = self.task_form.as_mut() {
                    form.handle_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_event_form_input(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        match key {
            KeyCode::Esc => {
                self.event_form = None;
                self.state = AppState::Grid;
                self.clear_status_message();
            }
            KeyCode::Enter => self.save_event_form(),
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(form) = self.event_form.as_ref() {
                    if form.can_delete() {
                        self.confirm = Some(ConfirmAction::DeleteEvent {
                            task_id: form.task_id,
                            week_date: form.week_date,
                        });
                        self.state = AppState::Confirm;
                    }
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.event_form.as_mut() {
                    form.next_field();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.event_form.as_mut() {
                    form.prev_field();
                }
            }
            KeyCode::Left => {
                if let Some(form) = self.event_form.as_mut() {
                    form.handle_left_right(false);
                }
            }
            KeyCode::Right => {
                if let Some(form) = self.event_form.as_mut() {
                    form.handle_left_right(true);
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = self.event_form.as_mut() {
                    form.handle_backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(form) = self.event_form.as_mut() {
                    form.handle_delete();
                }
            }
            KeyCode::Char(c) => {
                if let Some(form) = self.event_form.as_mut() {
                    form.handle_char(c);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Enter => self.apply_confirm(),
            KeyCode::Char('n') | KeyCode::Esc => {
                self.confirm = None;
                // Fall back to whichever modal spawned the confirm.
                self.state = if self.task_form.is_some() {
                    AppState::TaskForm
                } else if self.event_form.is_some() {
                    AppState::EventForm
                } else {
                    AppState::Grid
                };
            }
            _ => {}
        }
    }

    /// Render the full frame.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Grid
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_grid(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        match self.state {
            AppState::TaskForm => self.render_task_form(f),
            AppState::EventForm => self.render_event_form(f),
            AppState::Confirm => self.render_confirm(f),
            AppState::Help => self.render_help(f),
            AppState::Grid => {}
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let range = match (self.week_dates.first(), self.week_dates.last()) {
            (Some(first), Some(last)) => {
                format!("{} – {}", week::format_header(*first), week::format_header(*last))
            }
            _ => "no weeks".to_string(),
        };
        let summary = format!(
            "Weeks: {}  Tasks: {}  Events: {}",
            range,
            self.view.tasks.len(),
            self.index.len()
        );

        let header_text = vec![Line::from(vec![
            Span::styled(
                "PROJECT TIMELINE",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                summary,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    /// Number of date columns that fit beside the label column.
    fn visible_col_count(&self, area: Rect) -> usize {
        (area.width.saturating_sub(LABEL_WIDTH) / CELL_WIDTH) as usize
    }

    /// Keep the selected column and row inside the viewport.
    fn update_scroll(&mut self, area: Rect) {
        let visible_cols = self.visible_col_count(area).max(1);
        if self.selected_col >= 1 {
            let col = self.selected_col - 1;
            if col < self.col_offset {
                self.col_offset = col;
            } else if col >= self.col_offset + visible_cols {
                self.col_offset = col + 1 - visible_cols;
            }
        }

        let view_height = area.height.saturating_sub(1) as usize;
        if view_height > 0 {
            if self.selected_row < self.row_offset {
                self.row_offset = self.selected_row;
            } else if self.selected_row >= self.row_offset + view_height {
                self.row_offset = self.selected_row + 1 - view_height;
            }
        }
    }

    fn render_grid(&mut self, f: &mut Frame, area: Rect) {
        if area.height < 2 || area.width < LABEL_WIDTH + CELL_WIDTH {
            return;
        }
        if self.groups.is_empty() {
            let empty = Paragraph::new("No tasks yet. Press 'a' to add one.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(empty, area);
            return;
        }
        self.update_scroll(area);

        let today = Local::now().date_naive();
        let visible_cols = self.visible_col_count(area);

        // Column header row: fixed label cell, then one cell per week date.
        let label = Paragraph::new("Task").style(Style::default().add_modifier(Modifier::BOLD));
        f.render_widget(label, Rect::new(area.x, area.y, LABEL_WIDTH, 1));

        for (i, &date) in self
            .week_dates
            .iter()
            .enumerate()
            .skip(self.col_offset)
            .take(visible_cols)
        {
            let x = area.x + LABEL_WIDTH + ((i - self.col_offset) as u16) * CELL_WIDTH;
            let style = if week::is_current_week(date, today) {
                Style::default().bg(CURRENT_WEEK).add_modifier(Modifier::BOLD)
            } else if week::is_past_week(date, today) {
                Style::default().fg(PAST_WEEK)
            } else {
                Style::default()
            };
            let cell = Paragraph::new(week::format_header(date))
                .style(style)
                .alignment(Alignment::Center);
            f.render_widget(cell, Rect::new(x, area.y, CELL_WIDTH, 1));
        }

        // Body rows.
        let body_height = (area.height - 1) as usize;
        for (row_index, row) in self
            .rows
            .iter()
            .enumerate()
            .skip(self.row_offset)
            .take(body_height)
        {
            let y = area.y + 1 + (row_index - self.row_offset) as u16;
            let row_selected = row_index == self.selected_row;
            match row {
                GridRow::Category {
                    name,
                    count,
                    collapsed,
                } => {
                    let marker = if *collapsed { "▸" } else { "▾" };
                    let mut style = Style::default()
                        .bg(CATEGORY_BAR)
                        .add_modifier(Modifier::BOLD);
                    if row_selected {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let bar = Paragraph::new(format!("{marker} {name} ({count})")).style(style);
                    f.render_widget(bar, Rect::new(area.x, y, area.width, 1));
                }
                GridRow::Task { id } => {
                    let name = self
                        .view
                        .tasks
                        .iter()
                        .find(|t| t.id == *id)
                        .map(|t| t.task.clone())
                        .unwrap_or_default();
                    let mut style = Style::default();
                    if row_selected && self.selected_col == 0 {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let cell = Paragraph::new(format!(
                        "  {}",
                        truncate(&name, LABEL_WIDTH as usize - 3)
                    ))
                    .style(style);
                    f.render_widget(cell, Rect::new(area.x, y, LABEL_WIDTH, 1));

                    for (i, &date) in self
                        .week_dates
                        .iter()
                        .enumerate()
                        .skip(self.col_offset)
                        .take(visible_cols)
                    {
                        let x = area.x + LABEL_WIDTH + ((i - self.col_offset) as u16) * CELL_WIDTH;
                        let cell_selected = row_selected && self.selected_col == i + 1;
                        let rect = Rect::new(x, y, CELL_WIDTH, 1);
                        // Presence renders the event; absence is an empty,
                        // activatable cell.
                        match self.index.get(*id, date) {
                            Some(event) => {
                                let mut style = Style::default()
                                    .bg(colors::event_color(event.color.as_deref()))
                                    .fg(Color::Black);
                                if cell_selected {
                                    style = style.add_modifier(Modifier::REVERSED);
                                }
                                let text = truncate(
                                    event.label.as_deref().unwrap_or(""),
                                    CELL_WIDTH as usize - 1,
                                );
                                let cell = Paragraph::new(text)
                                    .style(style)
                                    .alignment(Alignment::Center);
                                f.render_widget(cell, rect);
                            }
                            None => {
                                let mut style = Style::default().fg(Color::DarkGray);
                                if cell_selected {
                                    style = style.add_modifier(Modifier::REVERSED);
                                }
                                let cell = Paragraph::new("·")
                                    .style(style)
                                    .alignment(Alignment::Center);
                                f.render_widget(cell, rect);
                            }
                        }
                    }
                }
            }
        }
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            "Enter: Open/Toggle | a: Add task | e: Edit | d: Delete | r: Reload | h: Help | q: Quit"
                .to_string()
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(CATEGORY_BAR).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Centered popup rect of the given size, clamped to the frame.
    fn popup_area(f: &Frame, width: u16, height: u16) -> Rect {
        let area = f.area();
        let w = width.min(area.width);
        let h = height.min(area.height);
        Rect::new(
            (area.width - w) / 2,
            (area.height - h) / 2,
            w,
            h,
        )
    }

    /// Style an input line, marking the active field.
    fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
        let style = if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let cursor = if active { "_" } else { "" };
        Line::from(vec![
            Span::raw(format!("{label:<14}")),
            Span::styled(format!("{value}{cursor}"), style),
        ])
    }

    fn render_task_form(&self, f: &mut Frame) {
        let Some(form) = self.task_form.as_ref() else {
            return;
        };
        let popup = Self::popup_area(f, 54, 10);
        f.render_widget(Clear, popup);

        let category_active = form.current_field == crate::tui::task_form::CATEGORY_FIELD;
        let category_line = if form.new_category_mode {
            Self::field_line("New category:", &form.new_category.value, category_active)
        } else {
            let selected = form
                .categories
                .get(form.category_index)
                .map(|s| s.as_str())
                .unwrap_or("-");
            Self::field_line("Category:", &format!("◀ {selected} ▶"), category_active)
        };

        let mut lines = vec![
            Line::from(""),
            category_line,
            Line::from(Span::styled(
                "              Ctrl+N: switch existing/new category",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Self::field_line(
                "Task name:",
                &form.name.value,
                form.current_field == crate::tui::task_form::NAME_FIELD,
            ),
            Line::from(""),
        ];
        let save_hint = if form.can_save() {
            Span::styled("Enter: Save", Style::default().fg(Color::Green))
        } else {
            // Save stays disabled until name and category resolve.
            Span::styled("Enter: Save (disabled)", Style::default().fg(Color::DarkGray))
        };
        let mut footer = vec![save_hint, Span::raw(" | Esc: Cancel")];
        if form.can_delete() {
            footer.push(Span::styled(
                " | Ctrl+D: Delete",
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(footer));

        let block = Block::default()
            .borders(Borders::ALL)
            .title(form.title())
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let popup_paragraph = Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup_paragraph, popup);
    }

    fn render_event_form(&self, f: &mut Frame) {
        let Some(form) = self.event_form.as_ref() else {
            return;
        };
        let task_name = self
            .view
            .tasks
            .iter()
            .find(|t| t.id == form.task_id)
            .map(|t| t.task.clone())
            .unwrap_or_default();
        let popup = Self::popup_area(f, 54, 10);
        f.render_widget(Clear, popup);

        let swatch_style = Style::default().bg(colors::event_color(form.color_hex()));
        let mut lines = vec![
            Line::from(""),
            Self::field_line(
                "Label:",
                &form.label.value,
                form.current_field == crate::tui::event_form::LABEL_FIELD,
            ),
            Line::from(""),
            Line::from(vec![
                Span::raw(format!("{:<14}", "Colour:")),
                Span::styled(
                    format!("◀ {} ▶ ", form.color_name()),
                    if form.current_field == crate::tui::event_form::COLOR_FIELD {
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
                Span::styled("    ", swatch_style),
            ]),
            Line::from(""),
        ];
        let mut footer = vec![
            Span::styled("Enter: Save", Style::default().fg(Color::Green)),
            Span::raw(" | Esc: Cancel"),
        ];
        if form.can_delete() {
            footer.push(Span::styled(
                " | Ctrl+D: Delete",
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(footer));

        let title = format!(
            "{} — {}",
            truncate(&task_name, 30),
            week::format_header(form.week_date)
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let popup_paragraph = Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup_paragraph, popup);
    }

    fn render_confirm(&self, f: &mut Frame) {
        let message = match self.confirm {
            Some(ConfirmAction::DeleteTask(id)) => {
                let name = self
                    .view
                    .tasks
                    .iter()
                    .find(|t| t.id == id)
                    .map(|t| t.task.clone())
                    .unwrap_or_else(|| format!("#{id}"));
                format!("Delete task \"{name}\" and all its events?")
            }
            Some(ConfirmAction::DeleteEvent { week_date, .. }) => {
                format!("Delete the event in week {}?", week::format_header(week_date))
            }
            None => return,
        };
        let popup = Self::popup_area(f, 50, 5);
        f.render_widget(Clear, popup);
        let lines = vec![
            Line::from(message),
            Line::from(""),
            Line::from("y: Confirm | n: Cancel"),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Confirm")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
        let popup_paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup_paragraph, popup);
    }

    fn render_help(&self, f: &mut Frame) {
        let popup = Self::popup_area(f, 58, 14);
        f.render_widget(Clear, popup);
        let lines = vec![
            Line::from("Arrows        Move between rows and week cells"),
            Line::from("Enter/Space   Toggle category / edit task / edit cell"),
            Line::from("a             Add a task"),
            Line::from("e             Edit the selected task"),
            Line::from("d             Delete the selected task"),
            Line::from("r             Reload data from disk"),
            Line::from("Home          Jump to the task-name column"),
            Line::from("q / Esc       Quit"),
            Line::from(""),
            Line::from("In forms: Tab cycles fields, ◀▶ change selectors,"),
            Line::from("Ctrl+N new category, Ctrl+D delete, Esc cancels."),
            Line::from(""),
            Line::from("Press any key to close"),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Help")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(Color::Cyan));
        let popup_paragraph = Paragraph::new(lines)
            .block(block)
            .style(Style::default().bg(Color::Black));
        f.render_widget(popup_paragraph, popup);
    }

    /// Main event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
