//! Shared domain enums
//!
//! Statuses are stored as short text codes in Postgres; the enums here are
//! the single source of truth for those codes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// BookStatus
// ---------------------------------------------------------------------------

/// Per-copy state machine shared by both reconcilers.
///
/// A book is claimed by a take-home loan (`OnLoan`) or by an in-library
/// reading session (`InLibrary`), never both: every claim is a conditional
/// update requiring `Available`, executed inside the operation's
/// transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Available,
    OnLoan,
    InLibrary,
}

impl BookStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::OnLoan => "on_loan",
            BookStatus::InLibrary => "in_library",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "available" => Some(BookStatus::Available),
            "on_loan" => Some(BookStatus::OnLoan),
            "in_library" => Some(BookStatus::InLibrary),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

// ---------------------------------------------------------------------------
// LogStatus
// ---------------------------------------------------------------------------

/// Library-log workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Pending,
    Approved,
    Returned,
}

impl LogStatus {
    pub fn as_code(&self) -> &'static str {
        match self {
            LogStatus::Pending => "pending",
            LogStatus::Approved => "approved",
            LogStatus::Returned => "returned",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(LogStatus::Pending),
            "approved" => Some(LogStatus::Approved),
            "returned" => Some(LogStatus::Returned),
            _ => None,
        }
    }
}

impl std::fmt::Display for LogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

// ---------------------------------------------------------------------------
// HistoryEntityType
// ---------------------------------------------------------------------------

/// Entity the history row is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryEntityType {
    BookBorrow,
    LibraryLog,
}

impl HistoryEntityType {
    pub fn as_code(&self) -> &'static str {
        match self {
            HistoryEntityType::BookBorrow => "book_borrow",
            HistoryEntityType::LibraryLog => "library_log",
        }
    }
}

// ---------------------------------------------------------------------------
// HistoryAction
// ---------------------------------------------------------------------------

/// Ledger action labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    BorrowHome,
    ReturnHome,
    UnReturn,
    LogCreate,
    LogEdit,
    LogApprove,
    LogReturn,
    LogUnreturn,
    LogToPending,
}

impl HistoryAction {
    pub fn as_code(&self) -> &'static str {
        match self {
            HistoryAction::BorrowHome => "borrow_home",
            HistoryAction::ReturnHome => "return_home",
            HistoryAction::UnReturn => "un_return",
            HistoryAction::LogCreate => "log_create",
            HistoryAction::LogEdit => "log_edit",
            HistoryAction::LogApprove => "log_approve",
            HistoryAction::LogReturn => "log_return",
            HistoryAction::LogUnreturn => "log_unreturn",
            HistoryAction::LogToPending => "log_to_pending",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_status_codes_round_trip() {
        for status in [BookStatus::Available, BookStatus::OnLoan, BookStatus::InLibrary] {
            assert_eq!(BookStatus::from_code(status.as_code()), Some(status));
        }
        assert_eq!(BookStatus::from_code("borrowed"), None);
    }

    #[test]
    fn test_log_status_codes_round_trip() {
        for status in [LogStatus::Pending, LogStatus::Approved, LogStatus::Returned] {
            assert_eq!(LogStatus::from_code(status.as_code()), Some(status));
        }
    }
}
