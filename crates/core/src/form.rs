use chrono::{Datelike, Duration, Local, Months, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::model::{Priority, Task, TaskDraft};

/// Raw field values supplied by whichever surface captures input (TUI form, CLI flags).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            priority: Priority::default().as_str().to_string(),
        }
    }
}

impl FormValues {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task
                .due_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            priority: task.priority.as_str().to_string(),
        }
    }

    pub fn to_draft(&self) -> Result<TaskDraft, FormError> {
        self.to_draft_at(Local::now().date_naive())
    }

    pub fn to_draft_at(&self, today: NaiveDate) -> Result<TaskDraft, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }

        let due_date = if self.due_date.trim().is_empty() {
            None
        } else {
            Some(parse_due_date_at(&self.due_date, today)?)
        };

        let priority = if self.priority.trim().is_empty() {
            Priority::default()
        } else {
            self.priority
                .parse()
                .map_err(|_| FormError::InvalidPriority(self.priority.trim().to_string()))?
        };

        Ok(TaskDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            due_date,
            priority,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Unrecognized due date '{0}'. Try YYYY-MM-DD, today, tomorrow, +3d, mon")]
    InvalidDate(String),
    #[error("Unknown priority '{0}': expected low|medium|high")]
    InvalidPriority(String),
}

/// Resolve a due-date expression relative to `today`.
pub fn parse_due_date_at(input: &str, today: NaiveDate) -> Result<NaiveDate, FormError> {
    static RELATIVE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\+(\d{1,4})([dwm])$").expect("valid regex"));

    let trimmed = input.trim();
    let invalid = || FormError::InvalidDate(trimmed.to_string());
    let lower = trimmed.to_ascii_lowercase();

    match lower.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return Ok(today + Duration::days(1)),
        _ => {}
    }

    if let Some(caps) = RELATIVE_RE.captures(&lower) {
        let value: u32 = caps[1].parse().map_err(|_| invalid())?;
        return match &caps[2] {
            "d" => Ok(today + Duration::days(value.into())),
            "w" => Ok(today + Duration::weeks(value.into())),
            _ => today.checked_add_months(Months::new(value)).ok_or_else(invalid),
        };
    }

    if let Some(weekday) = parse_weekday(&lower) {
        let mut days_ahead = (weekday.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64)
            .rem_euclid(7);
        if days_ahead == 0 {
            days_ahead = 7;
        }
        return Ok(today + Duration::days(days_ahead));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())
}

fn parse_weekday(label: &str) -> Option<Weekday> {
    match label {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
