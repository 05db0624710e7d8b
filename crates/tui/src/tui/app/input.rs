use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::controller::Intent;
use crate::tui::form::FormField;
use crate::tui::helpers::rect_contains;

use super::{App, ConfirmChoice, InputMode};

#[derive(Debug, Clone, Copy)]
pub(crate) enum NormalAction {
    Quit,
    Add,
    Edit,
    ToggleComplete,
    Delete,
    NextFilter,
    PrevFilter,
    CycleSort,
    ToggleTheme,
    ShowHelp,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
}

impl NormalAction {
    fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::Add),
            KeyCode::Char('e') | KeyCode::Enter => Some(Self::Edit),
            KeyCode::Char(' ') => Some(Self::ToggleComplete),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('f') | KeyCode::Tab => Some(Self::NextFilter),
            KeyCode::BackTab => Some(Self::PrevFilter),
            KeyCode::Char('s') => Some(Self::CycleSort),
            KeyCode::Char('t') => Some(Self::ToggleTheme),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            _ => None,
        }
    }
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Form => self.handle_form_mode(key),
            InputMode::Help => self.handle_help_mode(key),
            InputMode::ConfirmDelete => self.handle_confirm_delete_mode(key),
        }
    }

    /// A left click outside the open form dismisses it, like Esc.
    pub(crate) fn on_mouse(&mut self, mouse: MouseEvent) {
        if self.input_mode != InputMode::Form {
            return;
        }
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return;
        }
        let inside = self
            .form_area
            .map(|area| rect_contains(area, mouse.column, mouse.row))
            .unwrap_or(false);
        if !inside {
            self.cancel_form(Intent::DismissOutside);
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action);
        }
    }

    fn execute_normal_action(&mut self, action: NormalAction) {
        match action {
            NormalAction::Quit => self.should_quit = true,
            NormalAction::Add => self.start_add(),
            NormalAction::Edit => self.start_edit_current(),
            NormalAction::ToggleComplete => self.toggle_selected(),
            NormalAction::Delete => self.prompt_delete(),
            NormalAction::NextFilter => self.change_filter(true),
            NormalAction::PrevFilter => self.change_filter(false),
            NormalAction::CycleSort => self.cycle_sort(),
            NormalAction::ToggleTheme => self.toggle_theme(),
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::SelectFirst => self.select_first(),
            NormalAction::SelectLast => self.select_last(),
        }
    }

    fn handle_form_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.submit_form();
                return;
            }
            KeyCode::Esc => {
                self.cancel_form(Intent::Cancel);
                return;
            }
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            _ if self.form.focus == FormField::Priority => self.handle_priority_key(key),
            _ => self.handle_text_key(key),
        }
        self.sync_form_values();
    }

    fn handle_priority_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Right | KeyCode::Char(' ') => self.form.raise_priority(),
            KeyCode::Left => self.form.lower_priority(),
            KeyCode::Char(c) => {
                self.form.pick_priority(c);
            }
            _ => {}
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        let Some(buffer) = self.form.focused_buffer() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => buffer.insert_char(c),
            KeyCode::Backspace => buffer.backspace(),
            KeyCode::Delete => buffer.delete_char(),
            KeyCode::Left => buffer.move_left(),
            KeyCode::Right => buffer.move_right(),
            KeyCode::Home => buffer.move_home(),
            KeyCode::End => buffer.move_end(),
            _ => {}
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('q')
        ) {
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
    }

    fn handle_confirm_delete_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => self.resolve_delete(ConfirmChoice::No),
            KeyCode::Char('y') => self.resolve_delete(ConfirmChoice::Yes),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char(' ') => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Enter => self.resolve_delete(self.confirm_choice),
            _ => {}
        }
    }
}
