use crate::domain::{models::goal::Goal, ports::GoalRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteGoalRepo {
    pool: SqlitePool,
}

impl SqliteGoalRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl GoalRepository for SqliteGoalRepo {
    async fn create(&self, goal: &Goal) -> Result<Goal, AppError> {
        sqlx::query_as::<_, Goal>(
            "INSERT INTO goals (id, tenant_id, name, description, created_at) VALUES (?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&goal.id)
            .bind(&goal.tenant_id)
            .bind(&goal.name)
            .bind(&goal.description)
            .bind(goal.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Goal>, AppError> {
        sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, tenant_id: &str) -> Result<Vec<Goal>, AppError> {
        sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE tenant_id = ? ORDER BY created_at ASC")
            .bind(tenant_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
