use chrono::Utc;
use ulid::Ulid;

use crate::form::{FormError, FormValues};
use crate::model::{SortKey, Task, TaskFilter, Theme};
use crate::store::{KeyValueStore, TaskStore};
use crate::view::{render_view, Progress, RenderedView, TaskView};

/// Render target for the controller. Any UI layer (terminal, web, plain text) implements this.
pub trait Presenter {
    fn display(&mut self, records: &[TaskView], progress: Progress);
    fn apply_theme(&mut self, theme: Theme);
    /// Destructive-action guard; returning `false` leaves the collection untouched.
    fn confirm_delete(&mut self, task: &Task) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

impl EditorMode {
    pub fn title(&self) -> &'static str {
        match self {
            EditorMode::Create => "Add Task",
            EditorMode::Edit => "Edit Task",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Idle,
    /// `target: None` means the next submit creates a task.
    Editing {
        target: Option<String>,
        form: FormValues,
    },
}

impl Session {
    pub fn is_editing(&self) -> bool {
        matches!(self, Session::Editing { .. })
    }

    pub fn mode(&self) -> Option<EditorMode> {
        match self {
            Session::Idle => None,
            Session::Editing { target: None, .. } => Some(EditorMode::Create),
            Session::Editing { target: Some(_), .. } => Some(EditorMode::Edit),
        }
    }

    pub fn form(&self) -> Option<&FormValues> {
        match self {
            Session::Idle => None,
            Session::Editing { form, .. } => Some(form),
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut FormValues> {
        match self {
            Session::Idle => None,
            Session::Editing { form, .. } => Some(form),
        }
    }
}

/// User intents emitted by a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Add,
    Edit(String),
    Delete(String),
    ToggleComplete(String),
    SetFilter(TaskFilter),
    SetSort(SortKey),
    ToggleTheme,
    Submit(FormValues),
    Cancel,
    DismissOutside,
}

/// What a dispatched intent did. None of these are failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    EditorOpened(EditorMode),
    EditorClosed,
    Created(String),
    Updated(String),
    Toggled { id: String, completed: bool },
    Deleted(String),
    DeleteDeclined,
    NotFound,
    /// Submit arrived with no editor open; nothing changed.
    NoSession,
    Rejected(FormError),
    ViewChanged,
    ThemeChanged(Theme),
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub filter: TaskFilter,
    pub sort: SortKey,
    pub theme: Theme,
    pub session: Session,
}

impl AppState {
    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn view(&self) -> RenderedView {
        render_view(&self.tasks, self.filter, self.sort)
    }
}

/// Owns the session's task collection and view-state, persisting through [`TaskStore`].
pub struct Controller<S> {
    store: TaskStore<S>,
    state: AppState,
}

impl<S: KeyValueStore> Controller<S> {
    pub fn load(backend: S) -> Self {
        let store = TaskStore::new(backend);
        let state = AppState {
            tasks: store.get_tasks(),
            theme: store.get_theme(),
            ..AppState::default()
        };
        tracing::info!(
            tasks = state.tasks.len(),
            theme = state.theme.as_str(),
            "loaded task list"
        );
        Self { store, state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.state.session
    }

    /// Form fields of the open editor, for surfaces that edit them in place.
    pub fn form_mut(&mut self) -> Option<&mut FormValues> {
        self.state.session.form_mut()
    }

    pub fn start<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        presenter.apply_theme(self.state.theme);
        self.render(presenter);
    }

    pub fn render<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        let view = self.state.view();
        presenter.display(&view.records, view.progress);
    }

    pub fn dispatch<P: Presenter + ?Sized>(&mut self, intent: Intent, presenter: &mut P) -> Outcome {
        tracing::debug!(?intent, "dispatching intent");
        match intent {
            Intent::Add => self.open_new(),
            Intent::Edit(id) => self.open_edit(&id),
            Intent::Cancel | Intent::DismissOutside => self.close_editor(),
            Intent::Submit(values) => self.submit(values, presenter),
            Intent::ToggleComplete(id) => self.toggle_complete(&id, presenter),
            Intent::Delete(id) => self.delete_task(&id, presenter),
            Intent::SetFilter(filter) => self.set_filter(filter, presenter),
            Intent::SetSort(sort) => self.set_sort(sort, presenter),
            Intent::ToggleTheme => self.toggle_theme(presenter),
        }
    }

    pub fn open_new(&mut self) -> Outcome {
        self.state.session = Session::Editing {
            target: None,
            form: FormValues::default(),
        };
        Outcome::EditorOpened(EditorMode::Create)
    }

    /// Opens in edit mode even when `id` is unknown; the form is then left blank.
    pub fn open_edit(&mut self, id: &str) -> Outcome {
        let form = match self.state.find(id) {
            Some(task) => FormValues::from_task(task),
            None => {
                tracing::debug!(task_id = id, "edit target not found; leaving form blank");
                FormValues::default()
            }
        };
        self.state.session = Session::Editing {
            target: Some(id.to_string()),
            form,
        };
        Outcome::EditorOpened(EditorMode::Edit)
    }

    pub fn close_editor(&mut self) -> Outcome {
        self.state.session = Session::Idle;
        Outcome::EditorClosed
    }

    /// Rejected values keep the editor open so the user can correct them. Only an open
    /// editor accepts a submit.
    pub fn submit<P: Presenter + ?Sized>(&mut self, values: FormValues, presenter: &mut P) -> Outcome {
        let target = match &self.state.session {
            Session::Idle => {
                tracing::debug!("submit without an open editor ignored");
                return Outcome::NoSession;
            }
            Session::Editing { target, .. } => target.clone(),
        };

        let draft = match values.to_draft() {
            Ok(draft) => draft,
            Err(err) => {
                tracing::debug!(error = %err, "rejected form submission");
                if let Some(form) = self.state.session.form_mut() {
                    *form = values;
                }
                return Outcome::Rejected(err);
            }
        };

        let outcome = match target {
            None => {
                let id = Ulid::new().to_string();
                let task = draft.into_task(id.clone(), Utc::now());
                self.state.tasks.push(task);
                tracing::info!(task_id = id.as_str(), "created task");
                Outcome::Created(id)
            }
            Some(id) => match self.state.find_mut(&id) {
                Some(task) => {
                    draft.apply_to(task);
                    tracing::info!(task_id = id.as_str(), "updated task");
                    Outcome::Updated(id)
                }
                None => {
                    tracing::debug!(task_id = id.as_str(), "edit target vanished before submit");
                    Outcome::NotFound
                }
            },
        };

        if outcome != Outcome::NotFound {
            self.persist();
            self.render(presenter);
        }
        self.state.session = Session::Idle;
        outcome
    }

    pub fn toggle_complete<P: Presenter + ?Sized>(&mut self, id: &str, presenter: &mut P) -> Outcome {
        let outcome = match self.state.find_mut(id) {
            Some(task) => {
                task.completed = !task.completed;
                Outcome::Toggled {
                    id: id.to_string(),
                    completed: task.completed,
                }
            }
            None => Outcome::NotFound,
        };
        self.persist();
        self.render(presenter);
        outcome
    }

    /// An unknown id skips the confirmation but still persists and re-renders, like a toggle.
    pub fn delete_task<P: Presenter + ?Sized>(&mut self, id: &str, presenter: &mut P) -> Outcome {
        let confirmed = match self.state.find(id) {
            Some(task) => presenter.confirm_delete(task),
            None => {
                tracing::debug!(task_id = id, "delete target not found");
                self.persist();
                self.render(presenter);
                return Outcome::NotFound;
            }
        };
        if !confirmed {
            tracing::debug!(task_id = id, "deletion declined");
            return Outcome::DeleteDeclined;
        }

        self.state.tasks.retain(|task| task.id != id);
        tracing::info!(task_id = id, "deleted task");
        self.persist();
        self.render(presenter);
        Outcome::Deleted(id.to_string())
    }

    pub fn set_filter<P: Presenter + ?Sized>(&mut self, filter: TaskFilter, presenter: &mut P) -> Outcome {
        self.state.filter = filter;
        self.render(presenter);
        Outcome::ViewChanged
    }

    pub fn set_sort<P: Presenter + ?Sized>(&mut self, sort: SortKey, presenter: &mut P) -> Outcome {
        self.state.sort = sort;
        self.render(presenter);
        Outcome::ViewChanged
    }

    pub fn toggle_theme<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Outcome {
        let theme = self.state.theme.toggled();
        self.state.theme = theme;
        presenter.apply_theme(theme);
        self.store.save_theme(theme);
        Outcome::ThemeChanged(theme)
    }

    fn persist(&mut self) {
        self.store.save_tasks(&self.state.tasks);
    }
}
