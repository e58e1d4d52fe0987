//! Loan (take-home borrow) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Loan header from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookBorrow {
    pub id: i32,
    pub member_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub is_returned: bool,
    pub borrowing_fee: Decimal,
    pub is_paid: bool,
    pub deposit_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One physical copy on one loan
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookBorrowDetail {
    pub id: i32,
    pub borrow_id: i32,
    pub catalog_id: i32,
    pub book_id: i32,
    pub condition_out: String,
    pub condition_in: Option<String>,
    pub fine_amount: Option<Decimal>,
}

/// Append-only record of one return event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookReturn {
    pub id: i32,
    pub borrow_id: i32,
    pub return_date: DateTime<Utc>,
    pub late_days: i32,
    pub fine_amount: Decimal,
    pub extra_charge: Decimal,
    pub amount_paid: Decimal,
    pub refund_amount: Option<Decimal>,
}

/// Loan with its items and return events
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanDetails {
    #[serde(flatten)]
    pub borrow: BookBorrow,
    pub details: Vec<BookBorrowDetail>,
    pub returns: Vec<BookReturn>,
}

/// One requested item on a create/edit loan payload
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct LoanItem {
    pub catalog_id: i32,
    pub book_id: i32,
    pub condition_out: String,
}

impl LoanItem {
    /// A well-formed item names a book, a catalog and an outgoing condition
    pub fn is_well_formed(&self) -> bool {
        self.book_id > 0 && self.catalog_id > 0 && !self.condition_out.trim().is_empty()
    }
}

/// Create loan request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLoan {
    pub member_id: i32,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub borrowing_fee: Decimal,
    pub deposit_amount: Option<Decimal>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "at least one item is required"))]
    pub items: Vec<LoanItem>,
}

/// Edit loan request; `items` replaces the loan's item set
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLoan {
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub borrowing_fee: Decimal,
    pub is_paid: bool,
    pub deposit_amount: Option<Decimal>,
    pub notes: Option<String>,
    pub is_returned: bool,
    #[validate(length(min = 1, message = "at least one item is required"))]
    pub items: Vec<LoanItem>,
}

/// Per-item condition supplied at return time
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConditionItem {
    pub book_id: i32,
    pub condition_in: Option<String>,
    pub fine_amount: Option<Decimal>,
}

/// Return loan request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ReturnLoan {
    /// Defaults to now when absent
    pub return_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub late_days: i32,
    #[serde(default)]
    pub fine_amount: Decimal,
    #[serde(default)]
    pub extra_charge: Decimal,
    #[serde(default)]
    pub amount_paid: Decimal,
    pub refund_amount: Option<Decimal>,
    #[serde(default)]
    pub condition_items: Vec<ConditionItem>,
}

/// Un-return loan request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UnReturnLoan {
    /// Specific return event to undo; defaults to the most recent
    pub return_id: Option<i32>,
}

/// Loan list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatusFilter {
    Active,
    Returned,
    Overdue,
}

/// Loan list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    pub status: Option<LoanStatusFilter>,
    pub member_id: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// One member's overdue summary, consumed by the reminder sweep
#[derive(Debug, Clone, FromRow)]
pub struct OverdueReminder {
    pub member_name: String,
    pub telegram_chat_id: i64,
    pub loan_count: i64,
    pub earliest_due: NaiveDate,
}
