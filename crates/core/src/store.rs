use std::collections::HashMap;

use anyhow::Result;

use crate::model::{Task, Theme};

pub const TASKS_KEY: &str = "tasks";
pub const THEME_KEY: &str = "theme";

/// Durable string-keyed blob storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the task collection and theme preference.
///
/// Absent or unreadable values read back as "no tasks" and the light theme; failed writes
/// are logged and dropped. Callers never see a storage error.
#[derive(Debug)]
pub struct TaskStore<S> {
    backend: S,
}

impl<S: KeyValueStore> TaskStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn get_tasks(&self) -> Vec<Task> {
        let Some(raw) = self.read(TASKS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => tasks,
            Err(err) => {
                tracing::warn!(error = %err, "stored task list is unreadable; starting empty");
                Vec::new()
            }
        }
    }

    pub fn save_tasks(&mut self, tasks: &[Task]) {
        match serde_json::to_string(tasks) {
            Ok(raw) => self.write(TASKS_KEY, &raw),
            Err(err) => tracing::warn!(error = %err, "failed to serialize task list"),
        }
    }

    pub fn get_theme(&self) -> Theme {
        self.read(THEME_KEY)
            .map(|raw| Theme::from_storage(&raw))
            .unwrap_or_default()
    }

    pub fn save_theme(&mut self, theme: Theme) {
        self.write(THEME_KEY, theme.storage_value());
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read from store");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(err) = self.backend.set_item(key, value) {
            tracing::warn!(key, error = %err, "failed to write to store");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use anyhow::anyhow;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn task(id: &str, title: &str, due: Option<(i32, u32, u32)>, completed: bool) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            description: format!("{title} details"),
            due_date: due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            priority: Priority::High,
            completed,
            created_at: "2024-01-01T10:15:30.250Z".parse().unwrap(),
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("disk unavailable"))
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk unavailable"))
        }
    }

    #[test]
    fn saved_tasks_read_back_unchanged() {
        let mut store = TaskStore::new(MemoryStore::new());
        let tasks = vec![
            task("a", "Buy milk", Some((2024, 1, 10)), false),
            task("b", "File taxes", None, true),
        ];
        store.save_tasks(&tasks);
        assert_eq!(store.get_tasks(), tasks);
    }

    #[test]
    fn save_replaces_previous_collection() {
        let mut store = TaskStore::new(MemoryStore::new());
        store.save_tasks(&[task("a", "One", None, false), task("b", "Two", None, false)]);
        store.save_tasks(&[task("c", "Three", None, false)]);

        let ids: Vec<String> = store.get_tasks().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["c".to_string()]);
    }

    #[test]
    fn absent_or_corrupt_tasks_read_as_empty() {
        let empty = TaskStore::new(MemoryStore::new());
        assert!(empty.get_tasks().is_empty());

        let corrupt = TaskStore::new(MemoryStore::new().with_item(TASKS_KEY, "{not json"));
        assert!(corrupt.get_tasks().is_empty());

        let wrong_shape = TaskStore::new(MemoryStore::new().with_item(TASKS_KEY, "null"));
        assert!(wrong_shape.get_tasks().is_empty());
    }

    #[test]
    fn theme_defaults_to_light_and_persists() {
        let mut store = TaskStore::new(MemoryStore::new());
        assert_eq!(store.get_theme(), Theme::Light);

        store.save_theme(Theme::Dark);
        assert_eq!(store.get_theme(), Theme::Dark);
        assert_eq!(
            store.backend().get_item(THEME_KEY).unwrap().as_deref(),
            Some("dark-mode")
        );
    }

    #[test]
    fn backend_failures_degrade_quietly() {
        let mut store = TaskStore::new(FailingStore);
        store.save_tasks(&[task("a", "One", None, false)]);
        store.save_theme(Theme::Dark);
        assert!(store.get_tasks().is_empty());
        assert_eq!(store.get_theme(), Theme::Light);
    }
}
