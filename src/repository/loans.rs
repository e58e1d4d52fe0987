//! Loans repository: the take-home reconciler
//!
//! Every mutating operation runs in one transaction. Book claims are
//! conditional updates (`status = 'available'` required) and catalog
//! counter updates clamp in SQL, so no availability decision is made from
//! stale application-side reads.

use std::collections::BTreeMap;

use chrono::Utc;
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    ledger,
    models::{
        enums::{BookStatus, HistoryAction, HistoryEntityType},
        history::HistorySnapshot,
        loan::{
            BookBorrow, BookBorrowDetail, BookReturn, CreateLoan, LoanDetails, LoanQuery,
            LoanStatusFilter, OverdueReminder, ReturnLoan, UnReturnLoan, UpdateLoan,
        },
    },
    repository::{books::BooksRepository, catalogs::CatalogsRepository, histories::HistoriesRepository},
};

const BOOKS_UNAVAILABLE: &str = "One or more selected books are already on an active loan";

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get loan header by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BookBorrow> {
        sqlx::query_as::<_, BookBorrow>("SELECT * FROM book_borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Get loan with items and return events
    pub async fn get_details(&self, id: i32) -> AppResult<LoanDetails> {
        let borrow = self.get_by_id(id).await?;

        let details = sqlx::query_as::<_, BookBorrowDetail>(
            "SELECT * FROM book_borrow_details WHERE borrow_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let returns = sqlx::query_as::<_, BookReturn>(
            "SELECT * FROM book_returns WHERE borrow_id = $1 ORDER BY return_date",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(LoanDetails { borrow, details, returns })
    }

    /// List loan headers
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<BookBorrow>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        match query.status {
            Some(LoanStatusFilter::Active) => conditions.push("NOT is_returned".to_string()),
            Some(LoanStatusFilter::Returned) => conditions.push("is_returned".to_string()),
            Some(LoanStatusFilter::Overdue) => {
                conditions.push("NOT is_returned AND due_date < CURRENT_DATE".to_string())
            }
            None => {}
        }
        if query.member_id.is_some() {
            conditions.push(format!("member_id = ${}", idx));
            idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT * FROM book_borrows {} ORDER BY loan_date DESC, id DESC LIMIT ${} OFFSET ${}",
            where_clause,
            idx,
            idx + 1
        );

        let mut builder = sqlx::query_as::<_, BookBorrow>(&sql);
        if let Some(member_id) = query.member_id {
            builder = builder.bind(member_id);
        }
        builder = builder
            .bind(query.limit.unwrap_or(50).clamp(1, 500))
            .bind(query.offset.unwrap_or(0).max(0));

        let loans = builder.fetch_all(&self.pool).await?;
        Ok(loans)
    }

    /// Active loans for one member
    pub async fn get_member_loans(&self, member_id: i32) -> AppResult<Vec<BookBorrow>> {
        let loans = sqlx::query_as::<_, BookBorrow>(
            "SELECT * FROM book_borrows WHERE member_id = $1 ORDER BY loan_date DESC, id DESC",
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(loans)
    }

    /// Does the member hold an unreturned loan?
    pub async fn member_has_active_loan(&self, member_id: i32) -> AppResult<bool> {
        let active: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM book_borrows WHERE member_id = $1 AND NOT is_returned)",
        )
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(active)
    }

    /// Create a new loan: claim the books, move the catalog counters, write
    /// header + items and the `borrow_home` ledger row
    pub async fn create(&self, data: &CreateLoan) -> AppResult<LoanDetails> {
        // One active loan per member; checked before the transaction opens
        if self.member_has_active_loan(data.member_id).await? {
            return Err(AppError::BusinessRule(
                "Member already has an active loan".to_string(),
            ));
        }

        let book_ids: Vec<i32> = data.items.iter().map(|i| i.book_id).collect();
        let catalog_counts = ledger::count_by_catalog(
            &data.items.iter().map(|i| i.catalog_id).collect::<Vec<_>>(),
        );

        let mut tx = self.pool.begin().await?;

        BooksRepository::claim(&mut tx, &book_ids, BookStatus::OnLoan, BOOKS_UNAVAILABLE).await?;

        for (&catalog_id, &n) in &catalog_counts {
            CatalogsRepository::apply_counter_delta(&mut tx, catalog_id, -n, n, 0).await?;
        }

        let borrow = sqlx::query_as::<_, BookBorrow>(
            r#"
            INSERT INTO book_borrows (member_id, loan_date, due_date, borrowing_fee, deposit_amount, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.member_id)
        .bind(data.loan_date)
        .bind(data.due_date)
        .bind(data.borrowing_fee)
        .bind(data.deposit_amount)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await?;

        for item in &data.items {
            sqlx::query(
                r#"
                INSERT INTO book_borrow_details (borrow_id, catalog_id, book_id, condition_out)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(borrow.id)
            .bind(item.catalog_id)
            .bind(item.book_id)
            .bind(&item.condition_out)
            .execute(&mut *tx)
            .await?;
        }

        let snapshot = loan_snapshot(
            &mut tx,
            data.member_id,
            data.items.first().map(|i| i.catalog_id),
            data.items.len() as i32,
            Some(data.borrowing_fee),
        )
        .await?;
        HistoriesRepository::append(
            &mut tx,
            HistoryEntityType::BookBorrow,
            borrow.id,
            HistoryAction::BorrowHome,
            &snapshot,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(loan_id = borrow.id, member_id = data.member_id, "loan created");
        self.get_details(borrow.id).await
    }

    /// Edit a loan, reconciling inventory against the new item set.
    ///
    /// Claims depend on the return-state transition: resuming a returned
    /// loan re-claims every new book; an active loan claims only the added
    /// ones; transitions into `returned` claim nothing. The catalog delta
    /// is applied to `borrow_count` regardless of the branch.
    pub async fn update(&self, id: i32, data: &UpdateLoan) -> AppResult<LoanDetails> {
        let mut tx = self.pool.begin().await?;

        let borrow = sqlx::query_as::<_, BookBorrow>(
            "SELECT * FROM book_borrows WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        let old_details = sqlx::query_as::<_, BookBorrowDetail>(
            "SELECT * FROM book_borrow_details WHERE borrow_id = $1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let was_returned = borrow.is_returned;
        let will_return = data.is_returned;

        let old_books: Vec<i32> = old_details.iter().map(|d| d.book_id).collect();
        let new_books: Vec<i32> = data.items.iter().map(|i| i.book_id).collect();
        let added_books = ledger::added_ids(&old_books, &new_books);
        let removed_books = ledger::removed_ids(&old_books, &new_books);

        let old_catalogs: Vec<i32> = old_details.iter().map(|d| d.catalog_id).collect();
        let new_catalogs: Vec<i32> = data.items.iter().map(|i| i.catalog_id).collect();
        let delta = ledger::delta_by_catalog(&old_catalogs, &new_catalogs);

        // Claim / release book copies per return-state transition
        match (was_returned, will_return) {
            (true, false) => {
                // Resuming a settled loan re-claims everything
                BooksRepository::claim(&mut tx, &new_books, BookStatus::OnLoan, BOOKS_UNAVAILABLE)
                    .await?;
            }
            (false, false) => {
                BooksRepository::claim(&mut tx, &added_books, BookStatus::OnLoan, BOOKS_UNAVAILABLE)
                    .await?;
                BooksRepository::release(&mut tx, &removed_books).await?;
            }
            (false, true) => {
                // Becoming fully returned releases old and new alike
                let mut all: Vec<i32> = old_books.clone();
                all.extend(added_books.iter().copied());
                BooksRepository::release(&mut tx, &all).await?;
            }
            (true, true) => {}
        }

        // Availability moves per branch; borrow_count always follows the delta
        let mut avail_map: BTreeMap<i32, i64> = BTreeMap::new();
        match (was_returned, will_return) {
            (false, true) => {
                for (&catalog_id, &n) in &ledger::count_by_catalog(&old_catalogs) {
                    *avail_map.entry(catalog_id).or_insert(0) += n;
                }
            }
            (true, false) => {
                for (&catalog_id, &n) in &ledger::count_by_catalog(&new_catalogs) {
                    *avail_map.entry(catalog_id).or_insert(0) -= n;
                }
            }
            (false, false) => {
                for (&catalog_id, &net) in &delta.net() {
                    *avail_map.entry(catalog_id).or_insert(0) -= net;
                }
            }
            (true, true) => {}
        }

        let borrow_map = delta.net();
        let mut touched: Vec<i32> = avail_map.keys().chain(borrow_map.keys()).copied().collect();
        touched.sort_unstable();
        touched.dedup();
        for catalog_id in touched {
            let avail = avail_map.get(&catalog_id).copied().unwrap_or(0);
            let borrowed = borrow_map.get(&catalog_id).copied().unwrap_or(0);
            if avail != 0 || borrowed != 0 {
                CatalogsRepository::apply_counter_delta(&mut tx, catalog_id, avail, borrowed, 0)
                    .await?;
            }
        }

        // Diff-wise item update: drop removed rows, add new ones, refresh kept ones
        if !removed_books.is_empty() {
            sqlx::query(
                "DELETE FROM book_borrow_details WHERE borrow_id = $1 AND book_id = ANY($2)",
            )
            .bind(id)
            .bind(&removed_books)
            .execute(&mut *tx)
            .await?;
        }
        for item in &data.items {
            if added_books.contains(&item.book_id) {
                sqlx::query(
                    r#"
                    INSERT INTO book_borrow_details (borrow_id, catalog_id, book_id, condition_out)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(id)
                .bind(item.catalog_id)
                .bind(item.book_id)
                .bind(&item.condition_out)
                .execute(&mut *tx)
                .await?;
            } else {
                sqlx::query(
                    r#"
                    UPDATE book_borrow_details
                    SET catalog_id = $3, condition_out = $4
                    WHERE borrow_id = $1 AND book_id = $2
                    "#,
                )
                .bind(id)
                .bind(item.book_id)
                .bind(item.catalog_id)
                .bind(&item.condition_out)
                .execute(&mut *tx)
                .await?;
            }
        }

        // Shortcut return path: settle the loan without the explicit endpoint
        if !was_returned && will_return {
            let has_return: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM book_returns WHERE borrow_id = $1)",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            if !has_return {
                sqlx::query(
                    r#"
                    INSERT INTO book_returns (borrow_id, return_date, late_days, fine_amount, extra_charge, amount_paid)
                    VALUES ($1, $2, 0, 0, 0, 0)
                    "#,
                )
                .bind(id)
                .bind(Utc::now())
                .execute(&mut *tx)
                .await?;
            }

            let snapshot = loan_snapshot(
                &mut tx,
                borrow.member_id,
                data.items.first().map(|i| i.catalog_id),
                data.items.len() as i32,
                None,
            )
            .await?;
            HistoriesRepository::append(
                &mut tx,
                HistoryEntityType::BookBorrow,
                id,
                HistoryAction::ReturnHome,
                &snapshot,
            )
            .await?;
        }

        sqlx::query(
            r#"
            UPDATE book_borrows
            SET loan_date = $2, due_date = $3, borrowing_fee = $4, is_paid = $5,
                deposit_amount = $6, notes = $7, is_returned = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(data.loan_date)
        .bind(data.due_date)
        .bind(data.borrowing_fee)
        .bind(data.is_paid)
        .bind(data.deposit_amount)
        .bind(&data.notes)
        .bind(will_return)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(loan_id = id, was_returned, will_return, "loan updated");
        self.get_details(id).await
    }

    /// Return a loan: record the return event, restore counters, release the
    /// books
    pub async fn return_loan(&self, id: i32, data: &ReturnLoan) -> AppResult<LoanDetails> {
        let mut tx = self.pool.begin().await?;

        let borrow = sqlx::query_as::<_, BookBorrow>(
            "SELECT * FROM book_borrows WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        if borrow.is_returned {
            return Err(AppError::BusinessRule("Loan already returned".to_string()));
        }

        let details = sqlx::query_as::<_, BookBorrowDetail>(
            "SELECT * FROM book_borrow_details WHERE borrow_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for item in &data.condition_items {
            sqlx::query(
                r#"
                UPDATE book_borrow_details
                SET condition_in = $3, fine_amount = $4
                WHERE borrow_id = $1 AND book_id = $2
                "#,
            )
            .bind(id)
            .bind(item.book_id)
            .bind(&item.condition_in)
            .bind(item.fine_amount)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO book_returns (borrow_id, return_date, late_days, fine_amount, extra_charge, amount_paid, refund_amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(data.return_date.unwrap_or_else(Utc::now))
        .bind(data.late_days)
        .bind(data.fine_amount)
        .bind(data.extra_charge)
        .bind(data.amount_paid)
        .bind(data.refund_amount)
        .execute(&mut *tx)
        .await?;

        let catalog_ids: Vec<i32> = details.iter().map(|d| d.catalog_id).collect();
        for (&catalog_id, &n) in &ledger::count_by_catalog(&catalog_ids) {
            CatalogsRepository::apply_counter_delta(&mut tx, catalog_id, n, -n, 0).await?;
        }

        let book_ids: Vec<i32> = details.iter().map(|d| d.book_id).collect();
        BooksRepository::release(&mut tx, &book_ids).await?;

        sqlx::query("UPDATE book_borrows SET is_returned = TRUE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let snapshot = loan_snapshot(
            &mut tx,
            borrow.member_id,
            details.first().map(|d| d.catalog_id),
            details.len() as i32,
            Some(data.amount_paid),
        )
        .await?;
        HistoriesRepository::append(
            &mut tx,
            HistoryEntityType::BookBorrow,
            id,
            HistoryAction::ReturnHome,
            &snapshot,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(loan_id = id, "loan returned");
        self.get_details(id).await
    }

    /// Undo a return: drop the return event, re-claim the books, move the
    /// counters back
    pub async fn unreturn_loan(&self, id: i32, data: &UnReturnLoan) -> AppResult<LoanDetails> {
        let mut tx = self.pool.begin().await?;

        let borrow = sqlx::query_as::<_, BookBorrow>(
            "SELECT * FROM book_borrows WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        if !borrow.is_returned {
            return Err(AppError::BusinessRule("Loan is not returned".to_string()));
        }

        let removed = if let Some(return_id) = data.return_id {
            sqlx::query("DELETE FROM book_returns WHERE id = $1 AND borrow_id = $2")
                .bind(return_id)
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
        } else {
            sqlx::query(
                r#"
                DELETE FROM book_returns
                WHERE id = (
                    SELECT id FROM book_returns
                    WHERE borrow_id = $1
                    ORDER BY return_date DESC, id DESC
                    LIMIT 1
                )
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        };

        if removed == 0 {
            return Err(AppError::NotFound(format!(
                "No return event found for loan {}",
                id
            )));
        }

        let details = sqlx::query_as::<_, BookBorrowDetail>(
            "SELECT * FROM book_borrow_details WHERE borrow_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let book_ids: Vec<i32> = details.iter().map(|d| d.book_id).collect();
        BooksRepository::claim(
            &mut tx,
            &book_ids,
            BookStatus::OnLoan,
            "One or more books on this loan are no longer available",
        )
        .await?;

        let catalog_ids: Vec<i32> = details.iter().map(|d| d.catalog_id).collect();
        for (&catalog_id, &n) in &ledger::count_by_catalog(&catalog_ids) {
            CatalogsRepository::apply_counter_delta(&mut tx, catalog_id, -n, n, 0).await?;
        }

        sqlx::query("UPDATE book_borrows SET is_returned = FALSE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let snapshot = loan_snapshot(
            &mut tx,
            borrow.member_id,
            details.first().map(|d| d.catalog_id),
            details.len() as i32,
            None,
        )
        .await?;
        HistoriesRepository::append(
            &mut tx,
            HistoryEntityType::BookBorrow,
            id,
            HistoryAction::UnReturn,
            &snapshot,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(loan_id = id, "loan un-returned");
        self.get_details(id).await
    }

    /// Delete a loan, reversing its inventory effects first
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let borrow = sqlx::query_as::<_, BookBorrow>(
            "SELECT * FROM book_borrows WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;

        let details = sqlx::query_as::<_, BookBorrowDetail>(
            "SELECT * FROM book_borrow_details WHERE borrow_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        HistoriesRepository::delete_for(&mut tx, HistoryEntityType::BookBorrow, id).await?;

        let catalog_ids: Vec<i32> = details.iter().map(|d| d.catalog_id).collect();
        let counts = ledger::count_by_catalog(&catalog_ids);

        if !borrow.is_returned {
            let book_ids: Vec<i32> = details.iter().map(|d| d.book_id).collect();
            BooksRepository::release(&mut tx, &book_ids).await?;
            for (&catalog_id, &n) in &counts {
                CatalogsRepository::apply_counter_delta(&mut tx, catalog_id, n, -n, 0).await?;
            }
        } else {
            // borrow_count always gives back the loan's attribution
            for (&catalog_id, &n) in &counts {
                CatalogsRepository::apply_counter_delta(&mut tx, catalog_id, 0, -n, 0).await?;
            }
        }

        sqlx::query("DELETE FROM book_borrows WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(loan_id = id, "loan deleted");
        Ok(())
    }

    /// Count active loans
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_borrows WHERE NOT is_returned")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count overdue loans
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_borrows WHERE NOT is_returned AND due_date < CURRENT_DATE",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count loans returned today
    pub async fn count_returned_today(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM book_returns WHERE return_date::date = CURRENT_DATE",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Overdue summaries for members reachable over Telegram
    pub async fn overdue_reminders(&self) -> AppResult<Vec<OverdueReminder>> {
        let rows = sqlx::query_as::<_, OverdueReminder>(
            r#"
            SELECT m.name AS member_name,
                   m.telegram_chat_id AS telegram_chat_id,
                   COUNT(*) AS loan_count,
                   MIN(b.due_date) AS earliest_due
            FROM book_borrows b
            JOIN members m ON b.member_id = m.id
            WHERE NOT b.is_returned
              AND b.due_date < CURRENT_DATE
              AND m.telegram_chat_id IS NOT NULL
            GROUP BY m.id, m.name, m.telegram_chat_id
            ORDER BY earliest_due
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Denormalized snapshot for a loan history row, read inside the caller's
/// transaction
async fn loan_snapshot(
    conn: &mut PgConnection,
    member_id: i32,
    catalog_id: Option<i32>,
    quantity: i32,
    amount: Option<rust_decimal::Decimal>,
) -> AppResult<HistorySnapshot> {
    let member_name: Option<String> =
        sqlx::query_scalar("SELECT name FROM members WHERE id = $1")
            .bind(member_id)
            .fetch_optional(&mut *conn)
            .await?;

    let book_title = if let Some(catalog_id) = catalog_id {
        sqlx::query_scalar::<_, String>("SELECT title FROM catalogs WHERE id = $1")
            .bind(catalog_id)
            .fetch_optional(&mut *conn)
            .await?
    } else {
        None
    };

    Ok(HistorySnapshot {
        member_name,
        book_title,
        quantity,
        amount,
        note: None,
    })
}
