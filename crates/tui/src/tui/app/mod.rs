use std::time::Instant;

use anyhow::Result;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::TableState;

use super::constants::*;
use super::form::FormState;
use super::helpers::Palette;
use crate::config::AppConfig;
use crate::controller::{Controller, EditorMode, Intent, Outcome, Presenter};
use crate::db::Database;
use crate::model::{Task, Theme};
use crate::view::{short_id, Progress, TaskView};

mod input;
mod render;
#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Form,
    Help,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self, palette: &Palette) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(palette.accent),
            StatusKind::Error => Style::default().fg(palette.danger),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

/// What the controller last rendered, plus the answer to a pending delete prompt.
#[derive(Debug, Default)]
struct Screen {
    records: Vec<TaskView>,
    progress: Progress,
    theme: Theme,
    palette: Palette,
    confirm_choice: Option<ConfirmChoice>,
}

impl Presenter for Screen {
    fn display(&mut self, records: &[TaskView], progress: Progress) {
        self.records = records.to_vec();
        self.progress = progress;
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.palette = Palette::for_theme(theme);
    }

    fn confirm_delete(&mut self, _task: &Task) -> bool {
        self.confirm_choice.take() == Some(ConfirmChoice::Yes)
    }
}

pub(crate) struct App {
    config: AppConfig,
    controller: Controller<Database>,
    screen: Screen,
    first_run: bool,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    form: FormState,
    form_area: Option<Rect>,
    pending_delete: Option<String>,
    confirm_choice: ConfirmChoice,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(config: AppConfig, database: Database, first_run: bool) -> Result<Self> {
        let controller = Controller::load(database);
        let mut app = Self {
            config,
            controller,
            screen: Screen::default(),
            first_run,
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            form: FormState::default(),
            form_area: None,
            pending_delete: None,
            confirm_choice: ConfirmChoice::No,
            status: None,
            should_quit: false,
        };
        app.controller.start(&mut app.screen);
        app.sync_selection();
        Ok(app)
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn dispatch(&mut self, intent: Intent) -> Outcome {
        let outcome = self.controller.dispatch(intent, &mut self.screen);
        if !self.controller.session().is_editing() && self.input_mode == InputMode::Form {
            self.input_mode = InputMode::Normal;
            self.form_area = None;
        }
        self.sync_selection();
        outcome
    }

    fn selected_id(&self) -> Option<String> {
        self.screen
            .records
            .get(self.selected)
            .map(|record| record.id.clone())
    }

    fn sync_selection(&mut self) {
        if self.screen.records.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            self.selected = self.selected.min(self.screen.records.len() - 1);
            self.table_state.select(Some(self.selected));
        }
    }

    fn select_task_by_id(&mut self, id: &str) {
        if let Some(idx) = self.screen.records.iter().position(|record| record.id == id) {
            self.selected = idx;
            self.table_state.select(Some(idx));
        }
    }

    fn select_next(&mut self) {
        if self.screen.records.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.screen.records.len() - 1);
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.screen.records.is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
        self.table_state.select(Some(self.selected));
    }

    fn select_first(&mut self) {
        if !self.screen.records.is_empty() {
            self.selected = 0;
            self.table_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.screen.records.is_empty() {
            self.selected = self.screen.records.len() - 1;
            self.table_state.select(Some(self.selected));
        }
    }

    fn open_form(&mut self, intent: Intent) {
        if let Outcome::EditorOpened(mode) = self.dispatch(intent) {
            if let Some(values) = self.controller.session().form() {
                self.form.load(values);
            }
            self.input_mode = InputMode::Form;
            self.set_status_info(format!("{} • {}", mode.title(), STATUS_FORM));
        }
    }

    fn start_add(&mut self) {
        self.open_form(Intent::Add);
    }

    fn start_edit_current(&mut self) {
        match self.selected_id() {
            Some(id) => self.open_form(Intent::Edit(id)),
            None => self.set_status_info("Nothing to edit"),
        }
    }

    /// Mirrors the on-screen buffers into the controller's open session.
    fn sync_form_values(&mut self) {
        let values = self.form.values();
        if let Some(form) = self.controller.form_mut() {
            *form = values;
        }
    }

    fn submit_form(&mut self) {
        let values = self.form.values();
        match self.dispatch(Intent::Submit(values)) {
            Outcome::Created(id) => {
                self.select_task_by_id(&id);
                let label = self.task_label(&id);
                self.set_status_info(format!("Added {label}"));
            }
            Outcome::Updated(id) => {
                self.select_task_by_id(&id);
                let label = self.task_label(&id);
                self.set_status_info(format!("Updated {label}"));
            }
            Outcome::Rejected(err) => self.set_status_error(err.to_string()),
            Outcome::NotFound => self.set_status_error(STATUS_NOT_FOUND),
            _ => {}
        }
    }

    fn cancel_form(&mut self, intent: Intent) {
        self.dispatch(intent);
        self.status = None;
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_info("Nothing to toggle");
            return;
        };
        match self.dispatch(Intent::ToggleComplete(id)) {
            Outcome::Toggled { id, completed } => {
                self.select_task_by_id(&id);
                let verb = if completed { "Completed" } else { "Reopened" };
                let label = self.task_label(&id);
                self.set_status_info(format!("{verb} {label}"));
            }
            _ => self.set_status_error(STATUS_NOT_FOUND),
        }
    }

    fn prompt_delete(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_info("Nothing to delete");
            return;
        };
        self.pending_delete = Some(id);
        self.confirm_choice = ConfirmChoice::No;
        self.input_mode = InputMode::ConfirmDelete;
        self.set_status_info(STATUS_CONFIRM_DELETE);
    }

    /// Answers the controller's confirmation with the current choice.
    fn resolve_delete(&mut self, choice: ConfirmChoice) {
        self.input_mode = InputMode::Normal;
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        let label = self.task_label(&id);
        self.screen.confirm_choice = Some(choice);
        match self.dispatch(Intent::Delete(id)) {
            Outcome::Deleted(_) => self.set_status_info(format!("Deleted {label}")),
            Outcome::DeleteDeclined => self.set_status_info(STATUS_DELETE_CANCELLED),
            _ => self.set_status_error(STATUS_NOT_FOUND),
        }
        self.screen.confirm_choice = None;
    }

    fn change_filter(&mut self, forward: bool) {
        let current = self.controller.state().filter;
        let filter = if forward { current.next() } else { current.prev() };
        let keep = self.selected_id();
        self.dispatch(Intent::SetFilter(filter));
        if let Some(id) = keep {
            self.select_task_by_id(&id);
        }
        self.set_status_info(format!("Showing {}", filter.label()));
    }

    fn cycle_sort(&mut self) {
        let sort = self.controller.state().sort.next();
        let keep = self.selected_id();
        self.dispatch(Intent::SetSort(sort));
        if let Some(id) = keep {
            self.select_task_by_id(&id);
        }
        self.set_status_info(format!("Sorted by {}", sort.label()));
    }

    fn toggle_theme(&mut self) {
        if let Outcome::ThemeChanged(theme) = self.dispatch(Intent::ToggleTheme) {
            self.set_status_info(format!("Switched to {theme} theme"));
        }
    }

    fn show_help_overlay(&mut self) {
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }

    fn editor_mode(&self) -> EditorMode {
        self.controller
            .session()
            .mode()
            .unwrap_or(EditorMode::Create)
    }

    fn task_label(&self, id: &str) -> String {
        match self.controller.state().find(id) {
            Some(task) => format!("'{}'", task.title),
            None => short_id(id).to_string(),
        }
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        self.status = Some(StatusMessage::new(message, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        self.status = Some(StatusMessage::new(message, StatusKind::Error));
    }
}
