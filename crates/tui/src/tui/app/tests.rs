use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tempfile::TempDir;

use super::{App, InputMode, StatusKind};
use crate::config::AppConfig;
use crate::db::Database;
use crate::form::FormError;
use crate::model::{Priority, SortKey, Theme};
use crate::tui::helpers::{centered_rect, rect_contains, Palette};

fn app() -> (App, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
    let database = Database::open_in_memory().expect("db");
    let app = App::new(config, database, false).expect("app");
    (app, dir)
}

fn press(app: &mut App, code: KeyCode) {
    app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

fn add_task(app: &mut App, title: &str) {
    press(app, KeyCode::Char('a'));
    type_text(app, title);
    press(app, KeyCode::Enter);
}

fn titles(app: &App) -> Vec<String> {
    app.screen
        .records
        .iter()
        .map(|record| record.title.clone())
        .collect()
}

fn click(app: &mut App, column: u16, row: u16) {
    app.on_mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    });
}

fn draw(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(90, 28)).expect("terminal");
    terminal.draw(|f| app.draw(f)).expect("draw");
    terminal
        .backend()
        .buffer()
        .content
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn adding_a_task_through_the_form() {
    let (mut app, _dir) = app();
    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.input_mode, InputMode::Form);

    type_text(&mut app, "Buy milk");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(titles(&app), vec!["Buy milk"]);
    assert_eq!(app.screen.records[0].priority, Priority::Medium);
    assert!(app.status.as_ref().unwrap().text.contains("Added"));
    assert!(!app.controller.session().is_editing());
}

#[test]
fn blank_title_keeps_the_form_open() {
    let (mut app, _dir) = app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "   ");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Form);
    assert!(app.controller.session().is_editing());
    assert!(app.screen.records.is_empty());
    let status = app.status.as_ref().unwrap();
    assert!(matches!(status.kind, StatusKind::Error));
    assert_eq!(status.text, FormError::EmptyTitle.to_string());
}

#[test]
fn escape_cancels_without_saving() {
    let (mut app, _dir) = app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Nope");
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.screen.records.is_empty());
    assert!(!app.controller.session().is_editing());
}

#[test]
fn typing_mirrors_into_the_session() {
    let (mut app, _dir) = app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "abc");
    let form = app.controller.session().form().expect("editing");
    assert_eq!(form.title, "abc");
}

#[test]
fn all_form_fields_reach_the_task() {
    let (mut app, _dir) = app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Pay rent");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "monthly");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "2030-01-15");
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Right);
    press(&mut app, KeyCode::Enter);

    let record = &app.screen.records[0];
    assert_eq!(record.title, "Pay rent");
    assert_eq!(record.description.as_deref(), Some("monthly"));
    assert_eq!(record.due_label, "2030-01-15");
    assert_eq!(record.priority, Priority::High);
}

#[test]
fn invalid_due_date_is_rejected() {
    let (mut app, _dir) = app();
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Task");
    press(&mut app, KeyCode::Tab);
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "someday");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Form);
    assert!(app.status.as_ref().unwrap().text.contains("someday"));
}

#[test]
fn editing_prefills_and_updates_in_place() {
    let (mut app, _dir) = app();
    add_task(&mut app, "Draft");

    press(&mut app, KeyCode::Char('e'));
    assert_eq!(app.input_mode, InputMode::Form);
    assert_eq!(app.form.title.as_str(), "Draft");

    type_text(&mut app, " v2");
    press(&mut app, KeyCode::Enter);

    assert_eq!(titles(&app), vec!["Draft v2"]);
    assert!(app.status.as_ref().unwrap().text.contains("Updated"));
}

#[test]
fn toggling_and_filtering() {
    let (mut app, _dir) = app();
    add_task(&mut app, "First");
    add_task(&mut app, "Second");

    press(&mut app, KeyCode::Home);
    press(&mut app, KeyCode::Char(' '));
    assert!(app.screen.records[0].completed);
    assert_eq!(app.screen.progress.percent, 50);

    press(&mut app, KeyCode::Char('f'));
    assert_eq!(titles(&app), vec!["Second"]);

    press(&mut app, KeyCode::Char('f'));
    assert_eq!(titles(&app), vec!["First"]);

    press(&mut app, KeyCode::BackTab);
    press(&mut app, KeyCode::BackTab);
    assert_eq!(titles(&app), vec!["First", "Second"]);
}

#[test]
fn delete_defaults_to_no() {
    let (mut app, _dir) = app();
    add_task(&mut app, "Keep me");

    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.input_mode, InputMode::ConfirmDelete);
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(titles(&app), vec!["Keep me"]);
    assert!(app.status.as_ref().unwrap().text.contains("cancelled"));
}

#[test]
fn delete_after_choosing_yes() {
    let (mut app, _dir) = app();
    add_task(&mut app, "Remove me");
    add_task(&mut app, "Stay");

    press(&mut app, KeyCode::Home);
    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Enter);

    assert_eq!(titles(&app), vec!["Stay"]);

    press(&mut app, KeyCode::Delete);
    press(&mut app, KeyCode::Char('y'));
    assert!(app.screen.records.is_empty());
}

#[test]
fn escape_on_confirm_keeps_task() {
    let (mut app, _dir) = app();
    add_task(&mut app, "Still here");
    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Esc);
    assert_eq!(titles(&app), vec!["Still here"]);
}

#[test]
fn theme_toggle_updates_palette_and_store() {
    let (mut app, _dir) = app();
    assert_eq!(app.screen.theme, Theme::Light);

    press(&mut app, KeyCode::Char('t'));
    assert_eq!(app.screen.theme, Theme::Dark);
    assert_eq!(app.screen.palette, Palette::for_theme(Theme::Dark));
    assert_eq!(app.controller.store().get_theme(), Theme::Dark);
}

#[test]
fn sort_key_cycles() {
    let (mut app, _dir) = app();
    assert_eq!(app.controller.state().sort, SortKey::DateDesc);
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.controller.state().sort, SortKey::DateDesc.next());
}

#[test]
fn clicking_outside_the_form_dismisses_it() {
    let (mut app, _dir) = app();
    press(&mut app, KeyCode::Char('a'));
    draw(&mut app);
    let area = app.form_area.expect("form drawn");

    click(&mut app, area.x + 1, area.y + 1);
    assert_eq!(app.input_mode, InputMode::Form);

    click(&mut app, 0, 0);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(!app.controller.session().is_editing());
}

#[test]
fn empty_list_renders_empty_state() {
    let (mut app, _dir) = app();
    let screen = draw(&mut app);
    assert!(screen.contains("No tasks found."));
    assert!(screen.contains("0/0 done"));
}

#[test]
fn rendered_rows_show_no_date_label() {
    let (mut app, _dir) = app();
    add_task(&mut app, "Undated");
    let screen = draw(&mut app);
    assert!(screen.contains("Undated"));
    assert!(screen.contains("No date"));
}

#[test]
fn help_overlay_opens_and_closes() {
    let (mut app, _dir) = app();
    press(&mut app, KeyCode::Char('h'));
    assert_eq!(app.input_mode, InputMode::Help);
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn q_quits_from_normal_mode_only() {
    let (mut app, _dir) = app();
    press(&mut app, KeyCode::Char('a'));
    press(&mut app, KeyCode::Char('q'));
    assert!(!app.should_quit());
    assert_eq!(app.form.title.as_str(), "q");

    press(&mut app, KeyCode::Esc);
    press(&mut app, KeyCode::Char('q'));
    assert!(app.should_quit());
}

#[test]
fn centered_rect_keeps_within_bounds() {
    let area = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };
    let rect = centered_rect(40, 10, area);
    assert_eq!(rect, Rect::new(20, 7, 40, 10));
    assert!(rect_contains(rect, 20, 7));
    assert!(!rect_contains(rect, 60, 7));
    assert!(!rect_contains(rect, 20, 17));
}
