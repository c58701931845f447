use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Append-only note on an opportunity. Never updated after insert.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct OpportunityComment {
    pub id: String,
    pub opportunity_id: String,
    pub tenant_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl OpportunityComment {
    pub fn new(tenant_id: String, opportunity_id: String, user_id: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            opportunity_id,
            tenant_id,
            user_id,
            content,
            created_at: Utc::now(),
        }
    }
}
