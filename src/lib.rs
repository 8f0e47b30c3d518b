//! Custodia equipment inventory and maintenance tracking
//!
//! REST JSON API for managing equipment, where it is placed, who is
//! accountable for it and the maintenance performed on it.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod repository;
pub mod resolve;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
