//! API handlers for Biblios REST endpoints

pub mod catalogs;
pub mod health;
pub mod histories;
pub mod library_logs;
pub mod loans;
pub mod members;
pub mod openapi;
pub mod stats;
