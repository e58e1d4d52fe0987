//! Catalog (title-level inventory) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::book::Book;

/// Catalog model from database.
///
/// The four counters are the shared mutable resource of the system; every
/// write funnels through a transaction in the loan or library-log
/// repository, and the updates clamp in SQL (`0 <= available_copies <=
/// total_copies`, the two gauges `>= 0`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Catalog {
    pub id: i32,
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub borrow_count: i32,
    pub in_library_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Catalog with its physical copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogDetails {
    #[serde(flatten)]
    pub catalog: Catalog,
    pub books: Vec<Book>,
}

/// Create catalog request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCatalog {
    #[validate(length(min = 1, message = "title must not be blank"))]
    pub title: String,
    pub author: Option<String>,
    pub isbn: Option<String>,
    /// Barcodes for the initial physical copies, one per copy
    #[serde(default)]
    pub barcodes: Vec<String>,
}

/// Update catalog request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCatalog {
    #[validate(length(min = 1, message = "title must not be blank"))]
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

/// Catalog list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CatalogQuery {
    /// Substring match on title or author
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated catalog list
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogList {
    pub items: Vec<Catalog>,
    pub total: i64,
}
