use crate::domain::{models::goal::Goal, ports::GoalRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresGoalRepo {
    pool: PgPool,
}

impl PostgresGoalRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl GoalRepository for PostgresGoalRepo {
    async fn create(&self, goal: &Goal) -> Result<Goal, AppError> {
        sqlx::query_as::<_, Goal>(
            "INSERT INTO goals (id, tenant_id, name, description, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
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
        sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, tenant_id: &str) -> Result<Vec<Goal>, AppError> {
        sqlx::query_as::<_, Goal>("SELECT * FROM goals WHERE tenant_id = $1 ORDER BY created_at ASC")
            .bind(tenant_id)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
