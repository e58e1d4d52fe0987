//! History ledger repository
//!
//! Loan actions append one row each; library-log actions overwrite the
//! single row keyed by `(entity_type = 'library_log', entity_id)`. The
//! asymmetry matches the original bookkeeping and is deliberate.

use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        enums::{HistoryAction, HistoryEntityType},
        history::{History, HistoryQuery, HistorySnapshot},
    },
};

#[derive(Clone)]
pub struct HistoriesRepository {
    pool: Pool<Postgres>,
}

impl HistoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List history rows, optionally filtered by entity
    pub async fn list(&self, query: &HistoryQuery) -> AppResult<Vec<History>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if query.entity_type.is_some() {
            conditions.push(format!("entity_type = ${}", idx));
            idx += 1;
        }
        if query.entity_id.is_some() {
            conditions.push(format!("entity_id = ${}", idx));
            idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT * FROM histories {} ORDER BY updated_at DESC LIMIT ${} OFFSET ${}",
            where_clause,
            idx,
            idx + 1
        );

        let mut builder = sqlx::query_as::<_, History>(&sql);
        if let Some(ref entity_type) = query.entity_type {
            builder = builder.bind(entity_type);
        }
        if let Some(entity_id) = query.entity_id {
            builder = builder.bind(entity_id);
        }
        builder = builder
            .bind(query.limit.unwrap_or(50).clamp(1, 500))
            .bind(query.offset.unwrap_or(0).max(0));

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Append one row for a loan action, inside the caller's transaction
    pub async fn append(
        conn: &mut PgConnection,
        entity_type: HistoryEntityType,
        entity_id: i32,
        action: HistoryAction,
        snapshot: &HistorySnapshot,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO histories (entity_type, entity_id, action, member_name, book_title, quantity, amount, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entity_type.as_code())
        .bind(entity_id)
        .bind(action.as_code())
        .bind(&snapshot.member_name)
        .bind(&snapshot.book_title)
        .bind(snapshot.quantity)
        .bind(snapshot.amount)
        .bind(&snapshot.note)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Upsert the single row for a library log, overwriting the previous
    /// snapshot, inside the caller's transaction
    pub async fn upsert_for_log(
        conn: &mut PgConnection,
        log_id: i32,
        action: HistoryAction,
        snapshot: &HistorySnapshot,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO histories (entity_type, entity_id, action, member_name, book_title, quantity, amount, note)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (entity_type, entity_id) WHERE entity_type = 'library_log'
            DO UPDATE SET action = EXCLUDED.action,
                          member_name = EXCLUDED.member_name,
                          book_title = EXCLUDED.book_title,
                          quantity = EXCLUDED.quantity,
                          amount = EXCLUDED.amount,
                          note = EXCLUDED.note,
                          updated_at = NOW()
            "#,
        )
        .bind(HistoryEntityType::LibraryLog.as_code())
        .bind(log_id)
        .bind(action.as_code())
        .bind(&snapshot.member_name)
        .bind(&snapshot.book_title)
        .bind(snapshot.quantity)
        .bind(snapshot.amount)
        .bind(&snapshot.note)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    /// Delete every history row for one entity, inside the caller's
    /// transaction
    pub async fn delete_for(
        conn: &mut PgConnection,
        entity_type: HistoryEntityType,
        entity_id: i32,
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM histories WHERE entity_type = $1 AND entity_id = $2")
            .bind(entity_type.as_code())
            .bind(entity_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}
