use crate::domain::{
    models::opportunity::{Opportunity, OpportunityChange, OpportunityFilter, WriteGuard},
    ports::OpportunityRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteOpportunityRepo {
    pool: SqlitePool,
}

impl SqliteOpportunityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OpportunityRepository for SqliteOpportunityRepo {
    async fn create(&self, o: &Opportunity) -> Result<Opportunity, AppError> {
        sqlx::query_as::<_, Opportunity>(
            "INSERT INTO opportunities (id, tenant_id, sender_id, sender_handle, initial_content, source, status, relevance_score, tags, goal_id, assigned_to, needs_discussion, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&o.id).bind(&o.tenant_id).bind(&o.sender_id).bind(&o.sender_handle)
            .bind(&o.initial_content).bind(&o.source).bind(&o.status).bind(o.relevance_score)
            .bind(&o.tags).bind(&o.goal_id).bind(&o.assigned_to).bind(o.needs_discussion)
            .bind(o.created_at).bind(o.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Opportunity>, AppError> {
        sqlx::query_as::<_, Opportunity>("SELECT * FROM opportunities WHERE tenant_id = ? AND id = ?")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, tenant_id: &str, filter: &OpportunityFilter) -> Result<Vec<Opportunity>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM opportunities WHERE tenant_id = ");
        qb.push_bind(tenant_id.to_string());
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(assignee) = &filter.assigned_to {
            qb.push(" AND assigned_to = ").push_bind(assignee.clone());
        }
        if let Some(flag) = filter.needs_discussion {
            qb.push(" AND needs_discussion = ").push_bind(flag);
        }
        qb.push(" ORDER BY created_at DESC");

        qb.build_query_as::<Opportunity>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn apply_change(
        &self,
        tenant_id: &str,
        id: &str,
        change: &OpportunityChange,
        guard: &WriteGuard,
        now: DateTime<Utc>,
    ) -> Result<Option<Opportunity>, AppError> {
        let mut qb = QueryBuilder::<Sqlite>::new("UPDATE opportunities SET updated_at = ");
        qb.push_bind(now);

        match change {
            OpportunityChange::Relevance { score, explanation, by } => {
                qb.push(", relevance_score = ").push_bind(*score)
                    .push(", relevance_override_by = ").push_bind(by.clone())
                    .push(", relevance_override_at = ").push_bind(now)
                    .push(", relevance_override_explanation = ").push_bind(explanation.clone());
            }
            OpportunityChange::Goal(goal_id) => {
                qb.push(", goal_id = ").push_bind(goal_id.clone());
            }
            OpportunityChange::Assignee(user_id) => {
                qb.push(", assigned_to = ").push_bind(user_id.clone());
            }
            OpportunityChange::Discussion(flag) => {
                qb.push(", needs_discussion = ").push_bind(*flag);
            }
            OpportunityChange::Status { to, by } => {
                qb.push(", status = ").push_bind(to.as_str())
                    .push(", status_updated_by = ").push_bind(by.clone())
                    .push(", status_updated_at = ").push_bind(now);
            }
            OpportunityChange::Tags(tags) => {
                qb.push(", tags = ").push_bind(Json(tags.clone()));
            }
        }

        qb.push(" WHERE tenant_id = ").push_bind(tenant_id.to_string())
            .push(" AND id = ").push_bind(id.to_string());
        if let Some(expected) = guard.expected_status {
            qb.push(" AND status = ").push_bind(expected.as_str());
        }
        if let Some(score) = guard.score_below {
            qb.push(" AND relevance_score < ").push_bind(score);
        }
        qb.push(" RETURNING *");

        qb.build_query_as::<Opportunity>()
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
