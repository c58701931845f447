use crate::domain::{models::{invite_code::InviteCode, user::Role}, ports::InviteCodeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresInviteCodeRepo {
    pool: PgPool,
}

impl PostgresInviteCodeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteCodeRepository for PostgresInviteCodeRepo {
    async fn create(&self, invite: &InviteCode) -> Result<InviteCode, AppError> {
        sqlx::query_as::<_, InviteCode>(
            "INSERT INTO invite_codes (id, code, tenant_id, role, created_by, created_at, expires_at, used_at, used_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&invite.id)
            .bind(&invite.code)
            .bind(&invite.tenant_id)
            .bind(&invite.role)
            .bind(&invite.created_by)
            .bind(invite.created_at)
            .bind(invite.expires_at)
            .bind(invite.used_at)
            .bind(&invite.used_by)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<InviteCode>, AppError> {
        sqlx::query_as::<_, InviteCode>("SELECT * FROM invite_codes WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<InviteCode>, AppError> {
        sqlx::query_as::<_, InviteCode>(
            "SELECT * FROM invite_codes WHERE tenant_id = $1 ORDER BY created_at DESC"
        )
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn consume_and_grant(
        &self,
        code: &str,
        user_id: &str,
        role: Role,
        tenant_id: &str,
        used_at: DateTime<Utc>,
    ) -> Result<Option<InviteCode>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let consumed = sqlx::query_as::<_, InviteCode>(
            "UPDATE invite_codes SET used_at = $1, used_by = $2 WHERE code = $3 AND used_at IS NULL RETURNING *"
        )
            .bind(used_at)
            .bind(user_id)
            .bind(code)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let Some(consumed) = consumed else {
            return Ok(None);
        };

        let granted = sqlx::query("UPDATE users SET role = $1, tenant_id = $2 WHERE id = $3")
            .bind(role.as_str())
            .bind(tenant_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if granted.rows_affected() == 0 {
            // Dropping the transaction rolls the code back to unused.
            return Err(AppError::NotFound("User not found".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(consumed))
    }
}
