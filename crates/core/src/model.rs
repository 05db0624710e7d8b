use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Ordering weight used by the priority sorts.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(anyhow!(
                "Unknown priority '{}': expected low|medium|high",
                other
            )),
        }
    }
}

impl ValueEnum for Priority {
    fn value_variants<'a>() -> &'a [Self] {
        &[Priority::Low, Priority::Medium, Priority::High]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Pending => "pending",
            TaskFilter::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskFilter::All => "All",
            TaskFilter::Pending => "Pending",
            TaskFilter::Completed => "Completed",
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TaskFilter::All => TaskFilter::Pending,
            TaskFilter::Pending => TaskFilter::Completed,
            TaskFilter::Completed => TaskFilter::All,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TaskFilter::All => TaskFilter::Completed,
            TaskFilter::Pending => TaskFilter::All,
            TaskFilter::Completed => TaskFilter::Pending,
        }
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TaskFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "pending" => Ok(TaskFilter::Pending),
            "completed" | "done" => Ok(TaskFilter::Completed),
            other => Err(anyhow!(
                "Unknown filter '{}': expected all|pending|completed",
                other
            )),
        }
    }
}

impl ValueEnum for TaskFilter {
    fn value_variants<'a>() -> &'a [Self] {
        &[TaskFilter::All, TaskFilter::Pending, TaskFilter::Completed]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Display ordering applied after filtering. `Unsorted` keeps the filtered order
/// and is what any unrecognized sort value resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    DateAsc,
    #[default]
    DateDesc,
    PriorityAsc,
    PriorityDesc,
    Unsorted,
}

impl SortKey {
    pub const CYCLE: [SortKey; 4] = [
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::PriorityDesc,
        SortKey::PriorityAsc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateAsc => "date-asc",
            SortKey::DateDesc => "date-desc",
            SortKey::PriorityAsc => "priority-asc",
            SortKey::PriorityDesc => "priority-desc",
            SortKey::Unsorted => "unsorted",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::DateAsc => "Due date (soonest first)",
            SortKey::DateDesc => "Due date (latest first)",
            SortKey::PriorityAsc => "Priority (low to high)",
            SortKey::PriorityDesc => "Priority (high to low)",
            SortKey::Unsorted => "Unsorted",
        }
    }

    /// Lenient parse for values coming from the presentation layer.
    pub fn from_value(value: &str) -> Self {
        value.parse().unwrap_or(SortKey::Unsorted)
    }

    pub fn next(self) -> Self {
        let idx = Self::CYCLE.iter().position(|key| *key == self);
        match idx {
            Some(idx) => Self::CYCLE[(idx + 1) % Self::CYCLE.len()],
            None => Self::CYCLE[0],
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date-asc" => Ok(SortKey::DateAsc),
            "date-desc" => Ok(SortKey::DateDesc),
            "priority-asc" => Ok(SortKey::PriorityAsc),
            "priority-desc" => Ok(SortKey::PriorityDesc),
            other => Err(anyhow!(
                "Unknown sort '{}': expected date-asc|date-desc|priority-asc|priority-desc",
                other
            )),
        }
    }
}

impl ValueEnum for SortKey {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::CYCLE
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Tag written to the theme key.
    pub fn storage_value(&self) -> &'static str {
        match self {
            Theme::Light => "light-mode",
            Theme::Dark => "dark-mode",
        }
    }

    /// Unrecognized tags fall back to the light theme.
    pub fn from_storage(value: &str) -> Self {
        match value.trim() {
            "dark-mode" | "dark" => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "due_date_format")]
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated form contents, ready to become or update a [`Task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn into_task(self, id: String, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            completed: false,
            created_at,
        }
    }

    /// Overwrite the editable fields; identity, completion and creation time stay.
    pub fn apply_to(self, task: &mut Task) {
        task.title = self.title;
        task.description = self.description;
        task.due_date = self.due_date;
        task.priority = self.priority;
    }
}

// The browser form stored an empty string for "no date", so both spellings are read.
mod due_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return None;
            }
            match NaiveDate::parse_from_str(trimmed, FORMAT) {
                Ok(date) => Some(date),
                Err(err) => {
                    tracing::warn!(value = trimmed, error = %err, "ignoring unreadable due date");
                    None
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_task() -> Task {
        Task {
            id: "01HV0000000000000000000000".into(),
            title: "Buy milk".into(),
            description: String::new(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            priority: Priority::Medium,
            completed: false,
            created_at: "2024-01-01T08:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn task_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample_task()).unwrap();
        assert_eq!(json["dueDate"], "2024-01-10");
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["completed"], false);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn reads_records_written_by_the_browser_app() {
        let raw = r#"[{"id":"1704873600000","title":"Call mom","description":"",
            "dueDate":"","priority":"high","completed":true,
            "createdAt":"2024-01-10T08:00:00.000Z"}]"#;
        let tasks: Vec<Task> = serde_json::from_str(raw).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].due_date, None);
        assert_eq!(tasks[0].priority, Priority::High);
        assert!(tasks[0].completed);
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let raw = r#"{"id":"a","title":"t","priority":"low","createdAt":"2024-01-10T08:00:00Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, None);
        assert!(!task.completed);
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let raw = r#"{"id":"a","title":"t","priority":"urgent","createdAt":"2024-01-10T08:00:00Z"}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn sort_key_from_value_is_lenient() {
        assert_eq!(SortKey::from_value("priority-desc"), SortKey::PriorityDesc);
        assert_eq!(SortKey::from_value("alphabetical"), SortKey::Unsorted);
        assert!("alphabetical".parse::<SortKey>().is_err());
    }

    #[test]
    fn theme_storage_tags_round_trip() {
        assert_eq!(Theme::from_storage(Theme::Dark.storage_value()), Theme::Dark);
        assert_eq!(Theme::from_storage("light-mode"), Theme::Light);
        assert_eq!(Theme::from_storage("sepia"), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn draft_apply_keeps_identity_and_completion() {
        let mut task = sample_task();
        task.completed = true;
        let draft = TaskDraft {
            title: "Buy oat milk".into(),
            description: "the barista one".into(),
            due_date: None,
            priority: Priority::High,
        };
        let before = task.clone();
        draft.apply_to(&mut task);

        assert_eq!(task.id, before.id);
        assert_eq!(task.created_at, before.created_at);
        assert!(task.completed);
        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.due_date, None);
    }
}
