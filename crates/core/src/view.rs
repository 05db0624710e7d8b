//! Derived list view: filter, then sort, then project into display records.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Priority, SortKey, Task, TaskFilter};

pub const NO_DATE_LABEL: &str = "No date";
pub const EMPTY_STATE_LABEL: &str = "No tasks found.";
const SHORT_ID_LEN: usize = 6;

/// Trailing characters of an id; ulid prefixes are timestamps and collide within a session.
pub fn short_id(id: &str) -> &str {
    let skip = id.chars().count().saturating_sub(SHORT_ID_LEN);
    match id.char_indices().nth(skip) {
        Some((index, _)) => &id[index..],
        None => id,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub due_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub completed: bool,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        let description = Some(task.description.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description,
            due_label: task
                .due_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| NO_DATE_LABEL.to_string()),
            due_date: task.due_date,
            priority: task.priority,
            completed: task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl Progress {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        let total = tasks.len();
        Self {
            completed,
            total,
            percent: percentage(completed, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RenderedView {
    pub records: Vec<TaskView>,
    pub progress: Progress,
}

pub fn filter_tasks(tasks: &[Task], filter: TaskFilter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

/// Returns a new ordering; equal keys keep their filtered order.
pub fn sort_tasks(mut tasks: Vec<&Task>, sort: SortKey) -> Vec<&Task> {
    match sort {
        SortKey::DateAsc => tasks.sort_by(|a, b| cmp_due_asc(a, b)),
        SortKey::DateDesc => tasks.sort_by(|a, b| cmp_due_desc(a, b)),
        SortKey::PriorityAsc => tasks.sort_by_key(|task| task.priority.rank()),
        SortKey::PriorityDesc => tasks.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        SortKey::Unsorted => {}
    }
    tasks
}

pub fn render_view(tasks: &[Task], filter: TaskFilter, sort: SortKey) -> RenderedView {
    let records = sort_tasks(filter_tasks(tasks, filter), sort)
        .into_iter()
        .map(TaskView::from)
        .collect();
    RenderedView {
        records,
        progress: Progress::of(tasks),
    }
}

// Undated tasks compare as the latest possible date.
fn cmp_due_asc(a: &Task, b: &Task) -> Ordering {
    let a = a.due_date.unwrap_or(NaiveDate::MAX);
    let b = b.due_date.unwrap_or(NaiveDate::MAX);
    a.cmp(&b)
}

// Undated tasks compare as the earliest possible date.
fn cmp_due_desc(a: &Task, b: &Task) -> Ordering {
    let a = a.due_date.unwrap_or(NaiveDate::MIN);
    let b = b.due_date.unwrap_or(NaiveDate::MIN);
    b.cmp(&a)
}

fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn task(id: &str, priority: Priority, due: Option<&str>, completed: bool) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {id}"),
            description: String::new(),
            due_date: due.map(|d| d.parse().unwrap()),
            priority,
            completed,
            created_at: Utc::now(),
        }
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    fn mixed() -> Vec<Task> {
        vec![
            task("a", Priority::Low, Some("2024-02-01"), false),
            task("b", Priority::High, None, true),
            task("c", Priority::Medium, Some("2024-01-15"), false),
            task("d", Priority::High, Some("2024-03-01"), true),
            task("e", Priority::Medium, None, false),
        ]
    }

    #[test]
    fn pending_filter_returns_incomplete_tasks() {
        let tasks = vec![
            task("done", Priority::Low, None, true),
            task("open", Priority::Low, None, false),
        ];
        assert_eq!(ids(&filter_tasks(&tasks, TaskFilter::Pending)), vec!["open"]);
    }

    #[test]
    fn pending_and_completed_partition_all() {
        let tasks = mixed();
        let all = ids(&filter_tasks(&tasks, TaskFilter::All));
        let pending = ids(&filter_tasks(&tasks, TaskFilter::Pending));
        let completed = ids(&filter_tasks(&tasks, TaskFilter::Completed));

        assert!(pending.iter().all(|id| !completed.contains(id)));
        let mut union: Vec<String> = pending.into_iter().chain(completed).collect();
        union.sort();
        assert_eq!(union, all);
    }

    #[test]
    fn priority_desc_orders_high_to_low() {
        let tasks = vec![
            task("low", Priority::Low, None, false),
            task("high", Priority::High, None, false),
            task("medium", Priority::Medium, None, false),
        ];
        let sorted = sort_tasks(filter_tasks(&tasks, TaskFilter::All), SortKey::PriorityDesc);
        assert_eq!(ids(&sorted), vec!["high", "medium", "low"]);
    }

    #[test]
    fn date_asc_places_undated_last() {
        let tasks = vec![
            task("undated", Priority::Low, None, false),
            task("dated", Priority::Low, Some("2024-03-01"), false),
        ];
        let sorted = sort_tasks(filter_tasks(&tasks, TaskFilter::All), SortKey::DateAsc);
        assert_eq!(ids(&sorted), vec!["dated", "undated"]);
    }

    #[rstest]
    #[case(SortKey::DateAsc, vec!["c", "a", "d", "b", "e"])]
    #[case(SortKey::DateDesc, vec!["d", "a", "c", "b", "e"])]
    #[case(SortKey::PriorityAsc, vec!["a", "c", "e", "b", "d"])]
    #[case(SortKey::PriorityDesc, vec!["b", "d", "c", "e", "a"])]
    #[case(SortKey::Unsorted, vec!["a", "b", "c", "d", "e"])]
    fn sorts_are_stable_for_equal_keys(#[case] sort: SortKey, #[case] expected: Vec<&str>) {
        let tasks = mixed();
        let sorted = sort_tasks(filter_tasks(&tasks, TaskFilter::All), sort);
        assert_eq!(ids(&sorted), expected);
    }

    #[test]
    fn sorting_keeps_membership() {
        let tasks = mixed();
        for sort in SortKey::CYCLE {
            let mut sorted = ids(&sort_tasks(filter_tasks(&tasks, TaskFilter::All), sort));
            sorted.sort();
            assert_eq!(sorted, vec!["a", "b", "c", "d", "e"]);
        }
    }

    #[test]
    fn short_id_keeps_the_tail() {
        assert_eq!(short_id("01HQZX8Y7K3QZP"), "7K3QZP");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(short_id(""), "");
    }

    #[test]
    fn progress_bounds() {
        assert_eq!(Progress::of(&[]).percent, 0);

        let all_done = vec![
            task("a", Priority::Low, None, true),
            task("b", Priority::Low, None, true),
        ];
        assert_eq!(Progress::of(&all_done).percent, 100);

        let one_of_three = vec![
            task("a", Priority::Low, None, true),
            task("b", Priority::Low, None, false),
            task("c", Priority::Low, None, false),
        ];
        assert_eq!(Progress::of(&one_of_three).percent, 33);
    }

    #[test]
    fn render_view_projects_records_and_counts_whole_collection() {
        let mut tasks = mixed();
        tasks[0].description = "  oat milk ".into();
        let view = render_view(&tasks, TaskFilter::Pending, SortKey::DateAsc);

        let record_ids: Vec<&str> = view.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(record_ids, vec!["c", "a", "e"]);
        assert_eq!(view.records[1].description.as_deref(), Some("oat milk"));
        assert_eq!(view.records[2].due_label, NO_DATE_LABEL);
        assert_eq!(
            view.progress,
            Progress {
                completed: 2,
                total: 5,
                percent: 40
            }
        );
    }
}
