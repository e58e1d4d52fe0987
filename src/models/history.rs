//! History (audit ledger) model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// History ledger row from database.
///
/// Denormalized snapshot, not authoritative for inventory state. Loan
/// actions append one row each; library-log actions overwrite the single
/// row keyed by `(entity_type = 'library_log', entity_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct History {
    pub id: i32,
    pub entity_type: String,
    pub entity_id: i32,
    pub action: String,
    pub member_name: Option<String>,
    pub book_title: Option<String>,
    pub quantity: i32,
    pub amount: Option<Decimal>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot written by the reconcilers
#[derive(Debug, Clone, Default)]
pub struct HistorySnapshot {
    pub member_name: Option<String>,
    pub book_title: Option<String>,
    pub quantity: i32,
    pub amount: Option<Decimal>,
    pub note: Option<String>,
}

/// History list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    /// `book_borrow` or `library_log`
    pub entity_type: Option<String>,
    pub entity_id: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
