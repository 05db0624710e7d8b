pub mod config;
pub mod controller;
pub mod database;
pub mod form;
pub mod model;
pub mod store;
pub mod view;

pub use config::AppConfig;
pub use controller::{AppState, Controller, EditorMode, Intent, Outcome, Presenter, Session};
pub use database::Database;
pub use form::{FormError, FormValues};
pub use model::*;
pub use store::{KeyValueStore, MemoryStore, TaskStore};
pub use view::{Progress, RenderedView, TaskView};
