//! Biblios Library Management System
//!
//! A Rust implementation of the Biblios library management server,
//! providing a REST JSON API for catalogs, members, take-home loans,
//! in-library reading logs and the inventory ledger that keeps them
//! consistent.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
