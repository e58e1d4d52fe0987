//! Library log (in-library reading session) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Library log header from database; `status` holds a
/// [`super::enums::LogStatus`] code
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibraryLog {
    pub id: i32,
    pub student_name: String,
    pub visit_date: NaiveDate,
    pub status: String,
    pub approved_at: Option<DateTime<Utc>>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One book on a library log, returned item by item
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibraryLogItem {
    pub id: i32,
    pub log_id: i32,
    pub book_id: i32,
    pub returned_date: Option<DateTime<Utc>>,
}

/// Log with its items
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogDetails {
    #[serde(flatten)]
    pub log: LibraryLog,
    pub items: Vec<LibraryLogItem>,
}

/// Create library log request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLibraryLog {
    #[validate(length(min = 1, message = "student_name must not be blank"))]
    pub student_name: String,
    pub visit_date: NaiveDate,
    #[validate(length(min = 1, message = "at least one book is required"))]
    pub book_ids: Vec<i32>,
}

/// Edit library log request; `book_ids` replaces the item set
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLibraryLog {
    #[validate(length(min = 1, message = "student_name must not be blank"))]
    pub student_name: String,
    pub visit_date: NaiveDate,
    #[validate(length(min = 1, message = "at least one book is required"))]
    pub book_ids: Vec<i32>,
}

/// Per-item return / un-return request; empty `book_ids` targets all items
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LogItemSelection {
    #[serde(default)]
    pub book_ids: Vec<i32>,
}

/// Library log list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LogQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
