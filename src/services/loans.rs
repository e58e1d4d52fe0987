//! Loan management service
//!
//! Input validation lives here, before any transaction opens; the
//! repository owns the transactional reconciliation itself.

use crate::{
    error::{AppError, AppResult},
    models::loan::{
        BookBorrow, CreateLoan, LoanDetails, LoanItem, LoanQuery, ReturnLoan, UnReturnLoan,
        UpdateLoan,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List loans
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<BookBorrow>> {
        self.repository.loans.list(query).await
    }

    /// Get a loan with items and return events
    pub async fn get(&self, id: i32) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(id).await
    }

    /// Create a new loan
    pub async fn create(&self, data: &CreateLoan) -> AppResult<LoanDetails> {
        if data.due_date < data.loan_date {
            return Err(AppError::Validation(
                "Due date must not be before the loan date".to_string(),
            ));
        }
        check_items(&data.items)?;

        // Verify member exists
        self.repository.members.get_by_id(data.member_id).await?;

        self.repository.loans.create(data).await
    }

    /// Edit a loan
    pub async fn update(&self, id: i32, data: &UpdateLoan) -> AppResult<LoanDetails> {
        if data.due_date < data.loan_date {
            return Err(AppError::Validation(
                "Due date must not be before the loan date".to_string(),
            ));
        }
        check_items(&data.items)?;

        self.repository.loans.update(id, data).await
    }

    /// Return a loan
    pub async fn return_loan(&self, id: i32, data: &ReturnLoan) -> AppResult<LoanDetails> {
        self.repository.loans.return_loan(id, data).await
    }

    /// Undo a return
    pub async fn unreturn_loan(&self, id: i32, data: &UnReturnLoan) -> AppResult<LoanDetails> {
        self.repository.loans.unreturn_loan(id, data).await
    }

    /// Delete a loan, reversing its inventory effects
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.loans.delete(id).await
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.loans.count_active().await
    }

    /// Count overdue loans
    pub async fn count_overdue(&self) -> AppResult<i64> {
        self.repository.loans.count_overdue().await
    }

    /// Members with overdue loans and a Telegram chat on file
    pub async fn overdue_reminders(&self) -> AppResult<Vec<crate::models::loan::OverdueReminder>> {
        self.repository.loans.overdue_reminders().await
    }
}

fn check_items(items: &[LoanItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::Validation(
            "At least one item is required".to_string(),
        ));
    }
    if items.iter().any(|item| !item.is_well_formed()) {
        return Err(AppError::Validation(
            "Each item needs a book, a catalog and an outgoing condition".to_string(),
        ));
    }
    let mut book_ids: Vec<i32> = items.iter().map(|i| i.book_id).collect();
    book_ids.sort_unstable();
    book_ids.dedup();
    if book_ids.len() != items.len() {
        return Err(AppError::Validation(
            "The same book appears more than once".to_string(),
        ));
    }
    Ok(())
}
