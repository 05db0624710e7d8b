use std::cmp::min;

use chrono::Local;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::block::Title;
use ratatui::widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use crate::config::ENV_DATA_DIR;
use crate::model::{Priority, TaskFilter};
use crate::tui::constants::{APP_VERSION, DUE_DATE_HINT};
use crate::tui::form::FormField;
use crate::tui::helpers::{build_help_lines, centered_rect, inset_rect};
use crate::view::{short_id, EMPTY_STATE_LABEL};

use super::{App, ConfirmChoice, InputMode};

const FILTERS: [TaskFilter; 3] = [TaskFilter::All, TaskFilter::Pending, TaskFilter::Completed];

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        let palette = self.screen.palette;
        f.render_widget(Clear, size);
        f.render_widget(
            Block::default().style(Style::default().bg(palette.base).fg(palette.text)),
            size,
        );
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_progress(f, chunks[1]);
        self.draw_filters(f, chunks[2]);
        self.draw_tasks(f, chunks[3]);
        self.draw_footer(f, chunks[4]);

        match self.input_mode {
            InputMode::Form => self.draw_form_overlay(f, size),
            InputMode::Help => self.draw_help_overlay(f, size),
            InputMode::ConfirmDelete => self.draw_confirm_overlay(f, size),
            InputMode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.screen.palette;
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let left = Line::from(vec![
            Span::styled(
                format!(" smart-todo v{} ", APP_VERSION),
                Style::default()
                    .fg(palette.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("💾 {}", self.config.db_path().display()),
                Style::default().fg(palette.muted),
            ),
        ]);
        f.render_widget(
            Paragraph::new(left).style(Style::default().bg(palette.base)),
            cols[0],
        );

        let right = Line::from(vec![Span::styled(
            format!("{} theme ", self.screen.theme),
            Style::default().fg(palette.muted),
        )]);
        f.render_widget(
            Paragraph::new(right)
                .alignment(Alignment::Right)
                .style(Style::default().bg(palette.base)),
            cols[1],
        );
    }

    fn draw_progress(&self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.screen.palette;
        let progress = self.screen.progress;
        let label = format!(
            "{}/{} done · {}%",
            progress.completed, progress.total, progress.percent
        );
        let gauge = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(palette.accent_title("Progress"))
                    .border_style(Style::default().fg(palette.border))
                    .style(Style::default().bg(palette.panel)),
            )
            .gauge_style(Style::default().fg(palette.success).bg(palette.highlight))
            .percent(u16::from(progress.percent.min(100)))
            .label(label);
        f.render_widget(gauge, area);
    }

    fn draw_filters(&self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.screen.palette;
        let state = self.controller.state();
        let titles: Vec<Line> = FILTERS
            .iter()
            .map(|filter| Line::from(filter.label()))
            .collect();
        let selected = FILTERS
            .iter()
            .position(|filter| *filter == state.filter)
            .unwrap_or(0);
        let sort_title = Title::from(Line::from(vec![Span::styled(
            format!(" Sort: {} ", state.sort.label()),
            Style::default().fg(palette.muted),
        )]))
        .alignment(Alignment::Right);

        let tabs = Tabs::new(titles)
            .select(selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(palette.accent_title("Filter"))
                    .title(sort_title)
                    .border_style(Style::default().fg(palette.border))
                    .style(Style::default().bg(palette.panel)),
            )
            .style(Style::default().fg(palette.text))
            .highlight_style(
                Style::default()
                    .fg(palette.accent)
                    .bg(palette.highlight)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_tasks(&mut self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.screen.palette;
        if self.screen.records.is_empty() {
            let lines = self.empty_task_state();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .style(Style::default().bg(palette.panel));
            let inner = block.inner(area);
            f.render_widget(block, area);

            if inner.width == 0 || inner.height == 0 {
                return;
            }

            let width = inner.width.min(80).max(1);
            let height = (lines.len() as u16).saturating_add(2).min(inner.height);
            let content_area = centered_rect(width, height, inner);
            let paragraph = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(palette.panel));
            f.render_widget(paragraph, content_area);
            return;
        }

        let today = Local::now().date_naive();
        let header = Row::new(vec![
            Cell::from(""),
            Cell::from("Title"),
            Cell::from("Due"),
            Cell::from("Priority"),
            Cell::from("ID"),
        ])
        .style(
            Style::default()
                .fg(palette.muted)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = self
            .screen
            .records
            .iter()
            .map(|record| {
                let mut title = vec![Span::raw(record.title.clone())];
                if let Some(description) = &record.description {
                    title.push(Span::styled(
                        format!("  {description}"),
                        Style::default().fg(palette.muted),
                    ));
                }
                let overdue = !record.completed && record.due_date.is_some_and(|due| due < today);
                let due_style = if overdue {
                    Style::default()
                        .fg(palette.danger)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let row_style = if record.completed {
                    Style::default()
                        .fg(palette.muted)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(palette.text)
                };
                Row::new(vec![
                    Cell::from(if record.completed { "✓" } else { "·" }),
                    Cell::from(Line::from(title)),
                    Cell::from(record.due_label.clone()).style(due_style),
                    Cell::from(record.priority.as_str())
                        .style(palette.priority_style(record.priority)),
                    Cell::from(short_id(&record.id).to_string())
                        .style(Style::default().fg(palette.muted)),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Length(2),
            Constraint::Min(20),
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Length(7),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(palette.accent_title("Tasks"))
                    .border_style(Style::default().fg(palette.border))
                    .style(Style::default().bg(palette.panel)),
            )
            .highlight_style(
                Style::default()
                    .bg(palette.highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn empty_task_state(&self) -> Vec<Line<'static>> {
        let palette = self.screen.palette;
        let hint_style = Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line<'static>> = vec![
            Line::from(vec![Span::styled(
                EMPTY_STATE_LABEL,
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::default(),
            Line::from(vec![Span::styled("Press 'a' to add a task.", hint_style)]),
        ];

        match self.controller.state().filter {
            TaskFilter::Pending if self.screen.progress.total > 0 => {
                lines.push(Line::from(vec![Span::styled(
                    "Everything is done. Press 'f' to see completed tasks.",
                    hint_style,
                )]));
            }
            TaskFilter::Completed if self.screen.progress.total > 0 => {
                lines.push(Line::from(vec![Span::styled(
                    "Nothing completed yet. Press Space on a task to finish it.",
                    hint_style,
                )]));
            }
            _ => {}
        }

        if self.first_run {
            lines.push(Line::default());
            lines.push(Line::from(vec![Span::styled(
                format!(
                    "Your tasks live in `{}` (adjust with `--data-dir` or `{}`).",
                    self.config.data_dir().display(),
                    ENV_DATA_DIR
                ),
                Style::default().fg(palette.muted),
            )]));
        }

        lines
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.screen.palette;
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = match &self.status {
            Some(status) => Line::from(vec![Span::styled(
                status.text.clone(),
                status.style(&palette),
            )]),
            None => Line::from(vec![Span::raw("Ready")]),
        };
        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = match self.input_mode {
            InputMode::Normal => {
                "j/k move | a add | e edit | space done | x delete | f/tab filter | s sort | t theme | h help | q quit"
            }
            InputMode::Form => "tab/shift+tab field | ←/→ priority | enter save | esc cancel",
            InputMode::Help => "enter/esc close",
            InputMode::ConfirmDelete => "←/→ choose | y yes | n no | enter confirm | esc cancel",
        };
        f.render_widget(
            Paragraph::new(Line::from(vec![Span::styled(
                help,
                Style::default().fg(palette.muted),
            )])),
            lines[1],
        );
    }

    fn draw_form_overlay(&mut self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.screen.palette;
        let width = min(area.width.saturating_sub(4), 70);
        let popup_area = centered_rect(width, 16, area);
        self.form_area = Some(popup_area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(palette.accent_title(self.editor_mode().title()))
            .border_style(Style::default().fg(palette.accent))
            .style(Style::default().bg(palette.panel).fg(palette.text));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        for (idx, field) in FormField::ALL.into_iter().enumerate() {
            self.draw_form_field(f, rows[idx], field);
        }

        f.render_widget(
            Paragraph::new(Line::from(vec![Span::styled(
                "Enter saves • Esc or click outside cancels",
                Style::default().fg(palette.muted),
            )]))
            .alignment(Alignment::Center),
            rows[4],
        );
    }

    fn draw_form_field(&self, f: &mut Frame<'_>, area: Rect, field: FormField) {
        let palette = self.screen.palette;
        let focused = self.form.focus == field;
        let border_style = if focused {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.border)
        };
        let title = match field {
            FormField::DueDate => format!("{} ({})", field.label(), DUE_DATE_HINT),
            _ => field.label().to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border_style);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let Some(buffer) = self.form.buffer(field) else {
            let spans: Vec<Span> = [Priority::Low, Priority::Medium, Priority::High]
                .into_iter()
                .flat_map(|priority| {
                    let style = if priority == self.form.priority {
                        palette
                            .priority_style(priority)
                            .bg(palette.highlight)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(palette.muted)
                    };
                    [
                        Span::styled(format!(" {} ", priority.as_str()), style),
                        Span::raw(" "),
                    ]
                })
                .collect();
            f.render_widget(Paragraph::new(Line::from(spans)), inner);
            return;
        };

        let column = buffer.cursor_column() as u16;
        let scroll = column.saturating_sub(inner.width.saturating_sub(1));
        f.render_widget(
            Paragraph::new(buffer.as_str()).scroll((0, scroll)),
            inner,
        );
        if focused && inner.width > 0 && inner.height > 0 {
            f.set_cursor(inner.x + column - scroll, inner.y);
        }
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.screen.palette;
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 70);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2)).max(8);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(palette.accent_title("Keyboard Reference"))
            .border_style(Style::default().fg(palette.border))
            .style(Style::default().bg(palette.panel));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let rows: Vec<Row> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Row::new(vec![
                    Cell::from(combo).style(Style::default().fg(palette.accent)),
                    Cell::from(desc).style(Style::default().fg(palette.text)),
                ])
            })
            .collect();
        let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(10)]).column_spacing(2);
        f.render_widget(table, inset_rect(inner, 1));
    }

    fn draw_confirm_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let palette = self.screen.palette;
        let width = min(area.width.saturating_sub(20), 60).max(40);
        let popup_area = centered_rect(width, 8, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(palette.accent_title("Confirm Deletion"))
            .border_style(Style::default().fg(palette.danger))
            .style(Style::default().bg(palette.panel));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let task_title = self
            .pending_delete
            .as_deref()
            .and_then(|id| self.controller.state().find(id))
            .map(|task| task.title.as_str())
            .unwrap_or("selected task");

        let chosen = |choice: ConfirmChoice| {
            let base = if choice == ConfirmChoice::Yes {
                palette.danger
            } else {
                palette.muted
            };
            if self.confirm_choice == choice {
                Style::default()
                    .fg(palette.panel)
                    .bg(base)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(base)
            }
        };

        let lines = vec![
            Line::from(vec![Span::styled(
                "This action cannot be undone.",
                Style::default().fg(palette.danger),
            )]),
            Line::from(vec![Span::styled(
                format!("Delete '{}'?", task_title),
                Style::default().fg(palette.text),
            )]),
            Line::default(),
            Line::from(vec![
                Span::styled("  Yes  ", chosen(ConfirmChoice::Yes)),
                Span::raw("    "),
                Span::styled("  No  ", chosen(ConfirmChoice::No)),
            ]),
        ];

        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(palette.panel)),
            inset_rect(inner, 1),
        );
    }
}
