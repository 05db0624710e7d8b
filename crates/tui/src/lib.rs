pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod tui;

pub use todo_core as core;
pub use todo_core::controller;
pub use todo_core::database as db;
pub use todo_core::form;
pub use todo_core::model;
pub use todo_core::view;

pub use todo_core::AppConfig;
