use std::cmp::min;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::{Priority, Theme};

/// Colors for one theme. Every draw call reads from the active palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Palette {
    pub base: Color,
    pub panel: Color,
    pub highlight: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
}

const DARK: Palette = Palette {
    base: Color::Rgb(14, 17, 23),
    panel: Color::Rgb(22, 26, 34),
    highlight: Color::Rgb(32, 37, 47),
    text: Color::Rgb(220, 224, 232),
    muted: Color::DarkGray,
    border: Color::DarkGray,
    accent: Color::Rgb(120, 161, 255),
    success: Color::Green,
    warning: Color::Yellow,
    danger: Color::Red,
};

const LIGHT: Palette = Palette {
    base: Color::Rgb(246, 247, 250),
    panel: Color::Rgb(255, 255, 255),
    highlight: Color::Rgb(225, 232, 245),
    text: Color::Rgb(30, 34, 42),
    muted: Color::Rgb(120, 126, 138),
    border: Color::Rgb(190, 196, 206),
    accent: Color::Rgb(44, 92, 197),
    success: Color::Rgb(28, 128, 60),
    warning: Color::Rgb(176, 112, 0),
    danger: Color::Rgb(190, 40, 40),
};

impl Palette {
    pub(crate) fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }

    pub(crate) fn priority_style(&self, priority: Priority) -> Style {
        let color = match priority {
            Priority::High => self.danger,
            Priority::Medium => self.warning,
            Priority::Low => self.success,
        };
        Style::default().fg(color)
    }

    pub(crate) fn accent_title(&self, text: &str) -> Line<'static> {
        Line::from(vec![Span::styled(
            text.to_owned(),
            Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD),
        )])
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(Theme::default())
    }
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn rect_contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("j / k or ↓ / ↑", "Move selection"),
        ("Home / End", "Jump to first / last task"),
        ("a", "Add a task"),
        ("e or Enter", "Edit selected task"),
        ("Space", "Toggle completed"),
        ("x / Delete", "Delete task (with confirmation)"),
        ("f / Tab", "Next filter (All, Pending, Completed)"),
        ("Shift+Tab", "Previous filter"),
        ("s", "Cycle sort order"),
        ("t", "Toggle light/dark theme"),
        ("h", "Toggle this help overlay"),
        ("Esc / click outside", "Close the task form"),
        ("q", "Quit"),
    ]
}
