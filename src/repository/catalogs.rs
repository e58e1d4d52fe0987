//! Catalogs repository for database operations

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        catalog::{Catalog, CatalogDetails, CatalogQuery, CreateCatalog, UpdateCatalog},
        enums::BookStatus,
    },
};

#[derive(Clone)]
pub struct CatalogsRepository {
    pool: Pool<Postgres>,
}

impl CatalogsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get catalog by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Catalog> {
        sqlx::query_as::<_, Catalog>("SELECT * FROM catalogs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Catalog with id {} not found", id)))
    }

    /// Get catalog with its physical copies
    pub async fn get_details(&self, id: i32) -> AppResult<CatalogDetails> {
        let catalog = self.get_by_id(id).await?;
        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE catalog_id = $1 ORDER BY barcode",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CatalogDetails { catalog, books })
    }

    /// List catalogs with optional title/author search
    pub async fn list(&self, query: &CatalogQuery) -> AppResult<(Vec<Catalog>, i64)> {
        let limit = query.limit.unwrap_or(50).clamp(1, 500);
        let offset = query.offset.unwrap_or(0).max(0);
        let pattern = query
            .search
            .as_ref()
            .map(|s| format!("%{}%", s.trim()));

        let (catalogs, total) = if let Some(ref pattern) = pattern {
            let rows = sqlx::query_as::<_, Catalog>(
                r#"
                SELECT * FROM catalogs
                WHERE title ILIKE $1 OR author ILIKE $1
                ORDER BY title
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM catalogs WHERE title ILIKE $1 OR author ILIKE $1",
            )
            .bind(pattern)
            .fetch_one(&self.pool)
            .await?;

            (rows, total)
        } else {
            let rows = sqlx::query_as::<_, Catalog>(
                "SELECT * FROM catalogs ORDER BY title LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalogs")
                .fetch_one(&self.pool)
                .await?;

            (rows, total)
        };

        Ok((catalogs, total))
    }

    /// Create a catalog, optionally with its initial barcoded copies
    pub async fn create(&self, data: &CreateCatalog) -> AppResult<Catalog> {
        let mut tx = self.pool.begin().await?;

        let initial = data.barcodes.len() as i32;
        let catalog = sqlx::query_as::<_, Catalog>(
            r#"
            INSERT INTO catalogs (title, author, isbn, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.isbn)
        .bind(initial)
        .fetch_one(&mut *tx)
        .await?;

        for barcode in &data.barcodes {
            sqlx::query("INSERT INTO books (catalog_id, barcode) VALUES ($1, $2)")
                .bind(catalog.id)
                .bind(barcode)
                .execute(&mut *tx)
                .await
                .map_err(|e| match e {
                    sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                        AppError::Conflict(format!("Barcode {} already exists", barcode))
                    }
                    other => AppError::Database(other),
                })?;
        }

        tx.commit().await?;
        Ok(catalog)
    }

    /// Update catalog title fields
    pub async fn update(&self, id: i32, data: &UpdateCatalog) -> AppResult<Catalog> {
        let catalog = sqlx::query_as::<_, Catalog>(
            r#"
            UPDATE catalogs
            SET title = COALESCE($2, title),
                author = COALESCE($3, author),
                isbn = COALESCE($4, isbn)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.author)
        .bind(&data.isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Catalog with id {} not found", id)))?;

        Ok(catalog)
    }

    /// Delete a catalog; rejected while any copy is claimed
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let claimed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM books WHERE catalog_id = $1 AND status <> $2",
        )
        .bind(id)
        .bind(BookStatus::Available.as_code())
        .fetch_one(&mut *tx)
        .await?;

        if claimed > 0 {
            return Err(AppError::BusinessRule(
                "Catalog has copies on loan or in the library".to_string(),
            ));
        }

        sqlx::query("DELETE FROM books WHERE catalog_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::BusinessRule(
                        "Catalog copies are referenced by loan or visit records".to_string(),
                    )
                }
                other => AppError::Database(other),
            })?;

        let result = sqlx::query("DELETE FROM catalogs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::BusinessRule(
                        "Catalog is referenced by loan records".to_string(),
                    )
                }
                other => AppError::Database(other),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Catalog with id {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Apply a clamped counter delta to one catalog row, inside the caller's
    /// transaction. `available_copies` clamps to `[0, total_copies]`, the
    /// two gauges to `>= 0`.
    pub async fn apply_counter_delta(
        conn: &mut PgConnection,
        catalog_id: i32,
        available_delta: i64,
        borrow_delta: i64,
        in_library_delta: i64,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE catalogs
            SET available_copies = LEAST(GREATEST(available_copies + $2, 0), total_copies),
                borrow_count = GREATEST(borrow_count + $3, 0),
                in_library_count = GREATEST(in_library_count + $4, 0)
            WHERE id = $1
            "#,
        )
        .bind(catalog_id)
        .bind(available_delta)
        .bind(borrow_delta)
        .bind(in_library_delta)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Catalog with id {} not found",
                catalog_id
            )));
        }
        Ok(())
    }

    /// Count catalogs
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalogs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
