//! Books (physical copies) repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{book::Book, book::CreateBook, enums::BookStatus},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Get book by barcode
    pub async fn get_by_barcode(&self, barcode: &str) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE barcode = $1")
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with barcode {} not found", barcode)))
    }

    /// Add a physical copy under a catalog, bumping its copy counters
    pub async fn create(&self, catalog_id: i32, data: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (catalog_id, barcode, notes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(catalog_id)
        .bind(&data.barcode)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Barcode {} already exists", data.barcode))
            }
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                AppError::NotFound(format!("Catalog with id {} not found", catalog_id))
            }
            other => AppError::Database(other),
        })?;

        sqlx::query(
            r#"
            UPDATE catalogs
            SET total_copies = total_copies + 1,
                available_copies = available_copies + 1
            WHERE id = $1
            "#,
        )
        .bind(catalog_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Remove a physical copy; only available copies can be removed
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        if book.status != BookStatus::Available.as_code() {
            return Err(AppError::BusinessRule(
                "Book is on loan or in the library".to_string(),
            ));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::BusinessRule(
                        "Book is referenced by loan or visit records".to_string(),
                    )
                }
                other => AppError::Database(other),
            })?;

        sqlx::query(
            r#"
            UPDATE catalogs
            SET total_copies = GREATEST(total_copies - 1, 0),
                available_copies = GREATEST(available_copies - 1, 0)
            WHERE id = $1
            "#,
        )
        .bind(book.catalog_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Atomically claim a set of books for a new state, inside the caller's
    /// transaction. Every book must currently be `available`; on any miss
    /// the whole claim fails with a single aggregate conflict and the
    /// caller's transaction rolls back.
    pub async fn claim(
        conn: &mut PgConnection,
        book_ids: &[i32],
        target: BookStatus,
        conflict_message: &str,
    ) -> AppResult<()> {
        if book_ids.is_empty() {
            return Ok(());
        }

        let result = sqlx::query(
            "UPDATE books SET status = $1 WHERE id = ANY($2) AND status = $3",
        )
        .bind(target.as_code())
        .bind(book_ids)
        .bind(BookStatus::Available.as_code())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() != book_ids.len() as u64 {
            // Distinguish a missing book from one that is genuinely taken
            let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE id = ANY($1)")
                .bind(book_ids)
                .fetch_one(&mut *conn)
                .await?;
            if found != book_ids.len() as i64 {
                return Err(AppError::NotFound("One or more books not found".to_string()));
            }
            return Err(AppError::Conflict(conflict_message.to_string()));
        }
        Ok(())
    }

    /// Release a set of books back to `available`, inside the caller's
    /// transaction
    pub async fn release(conn: &mut PgConnection, book_ids: &[i32]) -> AppResult<()> {
        if book_ids.is_empty() {
            return Ok(());
        }

        sqlx::query("UPDATE books SET status = $1 WHERE id = ANY($2)")
            .bind(BookStatus::Available.as_code())
            .bind(book_ids)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Count books, total and currently available
    pub async fn counts(&self) -> AppResult<(i64, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        let available: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE status = $1")
                .bind(BookStatus::Available.as_code())
                .fetch_one(&self.pool)
                .await?;
        Ok((total, available))
    }
}
