//! Library log (in-library reading session) service

use crate::{
    error::{AppError, AppResult},
    models::library_log::{
        CreateLibraryLog, LibraryLog, LogDetails, LogItemSelection, LogQuery, UpdateLibraryLog,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LibraryLogsService {
    repository: Repository,
}

impl LibraryLogsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List logs
    pub async fn list(&self, query: &LogQuery) -> AppResult<Vec<LibraryLog>> {
        self.repository.library_logs.list(query).await
    }

    /// Get a log with its items
    pub async fn get(&self, id: i32) -> AppResult<LogDetails> {
        self.repository.library_logs.get_details(id).await
    }

    /// Create a new pending log
    pub async fn create(&self, data: &CreateLibraryLog) -> AppResult<LogDetails> {
        check_book_ids(&data.book_ids)?;
        self.repository.library_logs.create(data).await
    }

    /// Edit a log
    pub async fn update(&self, id: i32, data: &UpdateLibraryLog) -> AppResult<LogDetails> {
        check_book_ids(&data.book_ids)?;
        self.repository.library_logs.update(id, data).await
    }

    /// Approve a pending log
    pub async fn approve(&self, id: i32) -> AppResult<LogDetails> {
        self.repository.library_logs.approve(id).await
    }

    /// Return items (all, or the selected subset)
    pub async fn return_items(&self, id: i32, selection: &LogItemSelection) -> AppResult<LogDetails> {
        self.repository.library_logs.return_items(id, selection).await
    }

    /// Undo item returns
    pub async fn unreturn_items(&self, id: i32, selection: &LogItemSelection) -> AppResult<LogDetails> {
        self.repository.library_logs.unreturn_items(id, selection).await
    }

    /// Force-reset a log to pending
    pub async fn to_pending(&self, id: i32) -> AppResult<LogDetails> {
        self.repository.library_logs.to_pending(id).await
    }

    /// Delete a pending log
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.library_logs.delete(id).await
    }
}

fn check_book_ids(book_ids: &[i32]) -> AppResult<()> {
    if book_ids.is_empty() {
        return Err(AppError::Validation(
            "At least one book is required".to_string(),
        ));
    }
    if book_ids.iter().any(|&id| id <= 0) {
        return Err(AppError::Validation("Invalid book id".to_string()));
    }
    let mut unique: Vec<i32> = book_ids.to_vec();
    unique.sort_unstable();
    unique.dedup();
    if unique.len() != book_ids.len() {
        return Err(AppError::Validation(
            "The same book appears more than once".to_string(),
        ));
    }
    Ok(())
}
