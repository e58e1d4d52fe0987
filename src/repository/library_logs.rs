//! Library logs repository: the in-library reconciler
//!
//! Workflow is `pending -> approved -> returned`, with per-item returns,
//! `unreturn` and an unconditional `to_pending` reset. Books are claimed at
//! approve time, not at creation; `in_library_count` moves at approve and is
//! given back only by `to_pending`.

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    ledger,
    models::{
        enums::{BookStatus, HistoryAction, HistoryEntityType, LogStatus},
        history::HistorySnapshot,
        library_log::{
            CreateLibraryLog, LibraryLog, LibraryLogItem, LogDetails, LogItemSelection, LogQuery,
            UpdateLibraryLog,
        },
    },
    repository::{books::BooksRepository, catalogs::CatalogsRepository, histories::HistoriesRepository},
};

const BOOKS_IN_USE: &str = "One or more selected books are already in use";

#[derive(Clone)]
pub struct LibraryLogsRepository {
    pool: Pool<Postgres>,
}

impl LibraryLogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get log header by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<LibraryLog> {
        sqlx::query_as::<_, LibraryLog>("SELECT * FROM library_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Library log with id {} not found", id)))
    }

    /// Get log with its items
    pub async fn get_details(&self, id: i32) -> AppResult<LogDetails> {
        let log = self.get_by_id(id).await?;
        let items = sqlx::query_as::<_, LibraryLogItem>(
            "SELECT * FROM library_log_items WHERE log_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(LogDetails { log, items })
    }

    /// List log headers
    pub async fn list(&self, query: &LogQuery) -> AppResult<Vec<LibraryLog>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
            idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT * FROM library_logs {} ORDER BY visit_date DESC, id DESC LIMIT ${} OFFSET ${}",
            where_clause,
            idx,
            idx + 1
        );

        let mut builder = sqlx::query_as::<_, LibraryLog>(&sql);
        if let Some(ref status) = query.status {
            builder = builder.bind(status);
        }
        builder = builder
            .bind(query.limit.unwrap_or(50).clamp(1, 500))
            .bind(query.offset.unwrap_or(0).max(0));

        let logs = builder.fetch_all(&self.pool).await?;
        Ok(logs)
    }

    /// Create a new pending log. No counters or book statuses move yet, but
    /// the requested books must be free: `available` status and no
    /// unreturned item on any other log.
    pub async fn create(&self, data: &CreateLibraryLog) -> AppResult<LogDetails> {
        let mut tx = self.pool.begin().await?;

        check_books_free(&mut tx, &data.book_ids, None).await?;

        let log = sqlx::query_as::<_, LibraryLog>(
            r#"
            INSERT INTO library_logs (student_name, visit_date, status)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&data.student_name)
        .bind(data.visit_date)
        .bind(LogStatus::Pending.as_code())
        .fetch_one(&mut *tx)
        .await?;

        for &book_id in &data.book_ids {
            sqlx::query("INSERT INTO library_log_items (log_id, book_id) VALUES ($1, $2)")
                .bind(log.id)
                .bind(book_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| match e {
                    sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                        AppError::BadRequest(format!("Book {} listed twice", book_id))
                    }
                    sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                        AppError::NotFound(format!("Book with id {} not found", book_id))
                    }
                    other => AppError::Database(other),
                })?;
        }

        upsert_history(&mut tx, log.id, HistoryAction::LogCreate, &data.student_name, data.book_ids.len()).await?;

        tx.commit().await?;

        tracing::info!(log_id = log.id, "library log created");
        self.get_details(log.id).await
    }

    /// Edit a log. Pending logs change freely; approved logs reconcile the
    /// item diff against book statuses and `in_library_count`; returned logs
    /// reject edits.
    pub async fn update(&self, id: i32, data: &UpdateLibraryLog) -> AppResult<LogDetails> {
        let mut tx = self.pool.begin().await?;

        let log = lock_log(&mut tx, id).await?;
        let status = log_status(&log)?;

        if status == LogStatus::Returned {
            return Err(AppError::BusinessRule(
                "Returned logs cannot be edited".to_string(),
            ));
        }

        let old_items = sqlx::query_as::<_, LibraryLogItem>(
            "SELECT * FROM library_log_items WHERE log_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let old_books: Vec<i32> = old_items.iter().map(|i| i.book_id).collect();
        let added = ledger::added_ids(&old_books, &data.book_ids);
        let removed = ledger::removed_ids(&old_books, &data.book_ids);

        match status {
            LogStatus::Pending => {
                check_books_free(&mut tx, &added, Some(id)).await?;
            }
            LogStatus::Approved => {
                // Added books are claimed immediately; removed ones go free
                BooksRepository::claim(&mut tx, &added, BookStatus::InLibrary, BOOKS_IN_USE)
                    .await?;
                BooksRepository::release(&mut tx, &removed).await?;

                let old_catalogs = book_catalogs(&mut tx, &old_books).await?;
                let new_catalogs = book_catalogs(&mut tx, &data.book_ids).await?;
                for (&catalog_id, &net) in &ledger::delta_by_catalog(&old_catalogs, &new_catalogs).net() {
                    if net != 0 {
                        CatalogsRepository::apply_counter_delta(&mut tx, catalog_id, 0, 0, net)
                            .await?;
                    }
                }
            }
            LogStatus::Returned => unreachable!(),
        }

        if !removed.is_empty() {
            sqlx::query("DELETE FROM library_log_items WHERE log_id = $1 AND book_id = ANY($2)")
                .bind(id)
                .bind(&removed)
                .execute(&mut *tx)
                .await?;
        }
        for &book_id in &added {
            sqlx::query("INSERT INTO library_log_items (log_id, book_id) VALUES ($1, $2)")
                .bind(id)
                .bind(book_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE library_logs SET student_name = $2, visit_date = $3 WHERE id = $1")
            .bind(id)
            .bind(&data.student_name)
            .bind(data.visit_date)
            .execute(&mut *tx)
            .await?;

        upsert_history(&mut tx, id, HistoryAction::LogEdit, &data.student_name, data.book_ids.len()).await?;

        tx.commit().await?;

        tracing::info!(log_id = id, "library log updated");
        self.get_details(id).await
    }

    /// Approve a pending log: claim every book, bump `in_library_count`
    pub async fn approve(&self, id: i32) -> AppResult<LogDetails> {
        let mut tx = self.pool.begin().await?;

        let log = lock_log(&mut tx, id).await?;
        if log_status(&log)? != LogStatus::Pending {
            return Err(AppError::BusinessRule(
                "Only pending logs can be approved".to_string(),
            ));
        }

        let items = sqlx::query_as::<_, LibraryLogItem>(
            "SELECT * FROM library_log_items WHERE log_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let book_ids: Vec<i32> = items.iter().map(|i| i.book_id).collect();
        BooksRepository::claim(&mut tx, &book_ids, BookStatus::InLibrary, BOOKS_IN_USE).await?;

        let catalogs = book_catalogs(&mut tx, &book_ids).await?;
        for (&catalog_id, &n) in &ledger::count_by_catalog(&catalogs) {
            CatalogsRepository::apply_counter_delta(&mut tx, catalog_id, 0, 0, n).await?;
        }

        sqlx::query(
            "UPDATE library_logs SET status = $2, approved_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(LogStatus::Approved.as_code())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        upsert_history(&mut tx, id, HistoryAction::LogApprove, &log.student_name, items.len()).await?;

        tx.commit().await?;

        tracing::info!(log_id = id, "library log approved");
        self.get_details(id).await
    }

    /// Return items: stamp `returned_date` on the targeted unreturned items
    /// and release their books. The log flips to `returned` only once every
    /// item is returned.
    pub async fn return_items(&self, id: i32, selection: &LogItemSelection) -> AppResult<LogDetails> {
        let mut tx = self.pool.begin().await?;

        let log = lock_log(&mut tx, id).await?;
        if log_status(&log)? != LogStatus::Approved {
            return Err(AppError::BusinessRule(
                "Only approved logs can be returned".to_string(),
            ));
        }

        let items = sqlx::query_as::<_, LibraryLogItem>(
            "SELECT * FROM library_log_items WHERE log_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let targets: Vec<i32> = items
            .iter()
            .filter(|i| i.returned_date.is_none())
            .filter(|i| selection.book_ids.is_empty() || selection.book_ids.contains(&i.book_id))
            .map(|i| i.book_id)
            .collect();

        if targets.is_empty() {
            return Err(AppError::BadRequest(
                "No unreturned items match the request".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE library_log_items SET returned_date = $3 WHERE log_id = $1 AND book_id = ANY($2)",
        )
        .bind(id)
        .bind(&targets)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        BooksRepository::release(&mut tx, &targets).await?;

        let all_returned: bool = sqlx::query_scalar(
            "SELECT NOT EXISTS(SELECT 1 FROM library_log_items WHERE log_id = $1 AND returned_date IS NULL)",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if all_returned {
            sqlx::query("UPDATE library_logs SET status = $2, returned_at = $3 WHERE id = $1")
                .bind(id)
                .bind(LogStatus::Returned.as_code())
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
        }

        upsert_history(&mut tx, id, HistoryAction::LogReturn, &log.student_name, targets.len()).await?;

        tx.commit().await?;

        tracing::info!(log_id = id, returned = targets.len(), all_returned, "library log items returned");
        self.get_details(id).await
    }

    /// Undo item returns: clear `returned_date`, re-claim the books, revert
    /// the log to `approved` when not everything remains returned
    pub async fn unreturn_items(&self, id: i32, selection: &LogItemSelection) -> AppResult<LogDetails> {
        let mut tx = self.pool.begin().await?;

        let log = lock_log(&mut tx, id).await?;
        let status = log_status(&log)?;
        if status == LogStatus::Pending {
            return Err(AppError::BusinessRule(
                "Pending logs have no returns to undo".to_string(),
            ));
        }

        let items = sqlx::query_as::<_, LibraryLogItem>(
            "SELECT * FROM library_log_items WHERE log_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let targets: Vec<i32> = items
            .iter()
            .filter(|i| i.returned_date.is_some())
            .filter(|i| selection.book_ids.is_empty() || selection.book_ids.contains(&i.book_id))
            .map(|i| i.book_id)
            .collect();

        if targets.is_empty() {
            return Err(AppError::BadRequest(
                "No returned items match the request".to_string(),
            ));
        }

        sqlx::query(
            "UPDATE library_log_items SET returned_date = NULL WHERE log_id = $1 AND book_id = ANY($2)",
        )
        .bind(id)
        .bind(&targets)
        .execute(&mut *tx)
        .await?;

        BooksRepository::claim(&mut tx, &targets, BookStatus::InLibrary, BOOKS_IN_USE).await?;

        sqlx::query(
            "UPDATE library_logs SET status = $2, returned_at = NULL WHERE id = $1",
        )
        .bind(id)
        .bind(LogStatus::Approved.as_code())
        .execute(&mut *tx)
        .await?;

        upsert_history(&mut tx, id, HistoryAction::LogUnreturn, &log.student_name, targets.len()).await?;

        tx.commit().await?;

        tracing::info!(log_id = id, unreturned = targets.len(), "library log items un-returned");
        self.get_details(id).await
    }

    /// Force-reset a log to `pending` from any state, reversing the approve
    /// accounting if it had happened
    pub async fn to_pending(&self, id: i32) -> AppResult<LogDetails> {
        let mut tx = self.pool.begin().await?;

        let log = lock_log(&mut tx, id).await?;

        let items = sqlx::query_as::<_, LibraryLogItem>(
            "SELECT * FROM library_log_items WHERE log_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        if log.approved_at.is_some() {
            // Only unreturned items still hold their books
            let held: Vec<i32> = items
                .iter()
                .filter(|i| i.returned_date.is_none())
                .map(|i| i.book_id)
                .collect();
            BooksRepository::release(&mut tx, &held).await?;

            let book_ids: Vec<i32> = items.iter().map(|i| i.book_id).collect();
            let catalogs = book_catalogs(&mut tx, &book_ids).await?;
            for (&catalog_id, &n) in &ledger::count_by_catalog(&catalogs) {
                CatalogsRepository::apply_counter_delta(&mut tx, catalog_id, 0, 0, -n).await?;
            }
        }

        sqlx::query("UPDATE library_log_items SET returned_date = NULL WHERE log_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE library_logs SET status = $2, approved_at = NULL, returned_at = NULL WHERE id = $1",
        )
        .bind(id)
        .bind(LogStatus::Pending.as_code())
        .execute(&mut *tx)
        .await?;

        upsert_history(&mut tx, id, HistoryAction::LogToPending, &log.student_name, items.len()).await?;

        tx.commit().await?;

        tracing::info!(log_id = id, "library log reset to pending");
        self.get_details(id).await
    }

    /// Delete a pending log and its history rows
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let log = lock_log(&mut tx, id).await?;
        if log_status(&log)? != LogStatus::Pending {
            return Err(AppError::BusinessRule(
                "Only pending logs can be deleted".to_string(),
            ));
        }

        HistoriesRepository::delete_for(&mut tx, HistoryEntityType::LibraryLog, id).await?;

        sqlx::query("DELETE FROM library_logs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(log_id = id, "library log deleted");
        Ok(())
    }

    /// Count logs by status
    pub async fn count_by_status(&self, status: LogStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM library_logs WHERE status = $1")
            .bind(status.as_code())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Load the log row under a row lock
async fn lock_log(conn: &mut PgConnection, id: i32) -> AppResult<LibraryLog> {
    sqlx::query_as::<_, LibraryLog>("SELECT * FROM library_logs WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Library log with id {} not found", id)))
}

fn log_status(log: &LibraryLog) -> AppResult<LogStatus> {
    LogStatus::from_code(&log.status)
        .ok_or_else(|| AppError::Internal(format!("Invalid log status '{}'", log.status)))
}

/// A book is free for a new log item when its copy state is `available` and
/// no other log holds it unreturned
async fn check_books_free(
    conn: &mut PgConnection,
    book_ids: &[i32],
    exclude_log: Option<i32>,
) -> AppResult<()> {
    if book_ids.is_empty() {
        return Ok(());
    }

    let busy: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM books b
        WHERE b.id = ANY($1)
          AND (b.status <> $2
               OR EXISTS (
                   SELECT 1 FROM library_log_items i
                   WHERE i.book_id = b.id
                     AND i.returned_date IS NULL
                     AND ($3::int IS NULL OR i.log_id <> $3)
               ))
        "#,
    )
    .bind(book_ids)
    .bind(BookStatus::Available.as_code())
    .bind(exclude_log)
    .fetch_one(&mut *conn)
    .await?;

    if busy > 0 {
        return Err(AppError::Conflict(BOOKS_IN_USE.to_string()));
    }

    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = ANY($1)")
        .bind(book_ids)
        .fetch_one(&mut *conn)
        .await?;
    if found != book_ids.len() as i64 {
        return Err(AppError::NotFound("One or more books not found".to_string()));
    }
    Ok(())
}

/// Catalog id per book, in input order (duplicated books count twice)
async fn book_catalogs(conn: &mut PgConnection, book_ids: &[i32]) -> AppResult<Vec<i32>> {
    let mut catalogs = Vec::with_capacity(book_ids.len());
    for &book_id in book_ids {
        let catalog_id: i32 = sqlx::query_scalar("SELECT catalog_id FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;
        catalogs.push(catalog_id);
    }
    Ok(catalogs)
}

/// Overwrite the single history row for this log
async fn upsert_history(
    conn: &mut PgConnection,
    log_id: i32,
    action: HistoryAction,
    student_name: &str,
    quantity: usize,
) -> AppResult<()> {
    let snapshot = HistorySnapshot {
        member_name: Some(student_name.to_string()),
        quantity: quantity as i32,
        ..Default::default()
    };
    HistoriesRepository::upsert_for_log(&mut *conn, log_id, action, &snapshot).await
}
