//! Members repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, UpdateMember},
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get member by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// List members
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<Member>, i64)> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT * FROM members ORDER BY name LIMIT $1 OFFSET $2",
        )
        .bind(limit.clamp(1, 500))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;

        Ok((members, total))
    }

    /// Create a new member
    pub async fn create(&self, data: &CreateMember) -> AppResult<Member> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, phone, email, telegram_chat_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(data.telegram_chat_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    /// Update member fields
    pub async fn update(&self, id: i32, data: &UpdateMember) -> AppResult<Member> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                email = COALESCE($4, email),
                telegram_chat_id = COALESCE($5, telegram_chat_id)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.phone)
        .bind(&data.email)
        .bind(data.telegram_chat_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))?;

        Ok(member)
    }

    /// Delete a member; rejected while an active loan exists
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let has_active: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM book_borrows WHERE member_id = $1 AND NOT is_returned)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if has_active {
            return Err(AppError::BusinessRule(
                "Member has an active loan".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    AppError::BusinessRule("Member has loan history".to_string())
                }
                other => AppError::Database(other),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member with id {} not found", id)));
        }
        Ok(())
    }

    /// Count members
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
