use crate::domain::{models::comment::OpportunityComment, ports::CommentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCommentRepo {
    pool: PgPool,
}

impl PostgresCommentRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepo {
    async fn create(&self, comment: &OpportunityComment) -> Result<OpportunityComment, AppError> {
        sqlx::query_as::<_, OpportunityComment>(
            "INSERT INTO opportunity_comments (id, opportunity_id, tenant_id, user_id, content, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&comment.id)
            .bind(&comment.opportunity_id)
            .bind(&comment.tenant_id)
            .bind(&comment.user_id)
            .bind(&comment.content)
            .bind(comment.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_opportunity(&self, tenant_id: &str, opportunity_id: &str) -> Result<Vec<OpportunityComment>, AppError> {
        sqlx::query_as::<_, OpportunityComment>(
            "SELECT * FROM opportunity_comments WHERE tenant_id = $1 AND opportunity_id = $2 ORDER BY created_at ASC, id ASC"
        )
            .bind(tenant_id)
            .bind(opportunity_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
