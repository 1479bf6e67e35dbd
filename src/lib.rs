// Dance-class marketplace backend: classes, locations, instructors, special
// events and multi-facet reviews, served over axum with SQLite storage.

pub mod api;
pub mod app_state;
pub mod config;
pub mod core;
pub mod database;
pub mod error;
pub mod models;
pub mod services;

pub use app_state::AppState;
pub use config::Config;
pub use database::Database;
pub use error::{AppError, AppResult};
