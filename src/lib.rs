pub use todo_tui::cli;
pub use todo_tui::commands;
pub use todo_tui::config;
pub use todo_tui::logging;
pub use todo_tui::tui;
pub use todo_tui::AppConfig;

pub use todo_core as core;
pub use todo_core::controller;
pub use todo_core::database as db;
pub use todo_core::model;
pub use todo_core::store;
pub use todo_core::view;
