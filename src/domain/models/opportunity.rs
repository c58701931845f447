use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const UNCLASSIFIED_SCORE: i32 = -1;
pub const MAX_RELEVANCE_SCORE: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    Pending,
    Approved,
    Rejected,
    OnHold,
    ConversationStarted,
}

impl OpportunityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityStatus::Pending => "pending",
            OpportunityStatus::Approved => "approved",
            OpportunityStatus::Rejected => "rejected",
            OpportunityStatus::OnHold => "on_hold",
            OpportunityStatus::ConversationStarted => "conversation_started",
        }
    }

    pub fn allowed_transitions(&self) -> &'static [OpportunityStatus] {
        use OpportunityStatus::*;
        match self {
            Pending => &[Approved, Rejected, OnHold, ConversationStarted],
            OnHold => &[Pending, Approved, Rejected],
            Rejected => &[Pending],
            Approved => &[ConversationStarted],
            ConversationStarted => &[],
        }
    }

    pub fn can_transition_to(&self, next: OpportunityStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl fmt::Display for OpportunityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpportunityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OpportunityStatus::Pending),
            "approved" => Ok(OpportunityStatus::Approved),
            "rejected" => Ok(OpportunityStatus::Rejected),
            "on_hold" => Ok(OpportunityStatus::OnHold),
            "conversation_started" => Ok(OpportunityStatus::ConversationStarted),
            other => Err(format!("Unknown opportunity status: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Opportunity {
    pub id: String,
    pub tenant_id: String,
    pub sender_id: String,
    pub sender_handle: String,
    pub initial_content: String,
    pub source: String, // "widget" or "platform"
    pub status: String,
    pub relevance_score: i32,
    pub tags: Json<BTreeSet<String>>,
    pub goal_id: Option<String>,
    pub assigned_to: Option<String>,
    pub needs_discussion: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status_updated_by: Option<String>,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub relevance_override_by: Option<String>,
    pub relevance_override_at: Option<DateTime<Utc>>,
    pub relevance_override_explanation: Option<String>,
}

pub struct NewOpportunityParams {
    pub tenant_id: String,
    pub sender_id: String,
    pub sender_handle: String,
    pub content: String,
    pub source: String,
}

impl Opportunity {
    pub fn new(params: NewOpportunityParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            tenant_id: params.tenant_id,
            sender_id: params.sender_id,
            sender_handle: params.sender_handle,
            initial_content: params.content,
            source: params.source,
            status: OpportunityStatus::Pending.as_str().to_string(),
            relevance_score: UNCLASSIFIED_SCORE,
            tags: Json(BTreeSet::new()),
            goal_id: None,
            assigned_to: None,
            needs_discussion: false,
            created_at: now,
            updated_at: now,
            status_updated_by: None,
            status_updated_at: None,
            relevance_override_by: None,
            relevance_override_at: None,
            relevance_override_explanation: None,
        }
    }

    /// Rows are constrained by a CHECK on the status column, so a parse failure
    /// means the store was written outside this service.
    pub fn current_status(&self) -> Result<OpportunityStatus, String> {
        self.status.parse()
    }
}

/// One column-level mutation, written by a single conditional UPDATE.
#[derive(Debug, Clone)]
pub enum OpportunityChange {
    Relevance { score: i32, explanation: String, by: String },
    Goal(String),
    Assignee(String),
    Discussion(bool),
    Status { to: OpportunityStatus, by: String },
    Tags(BTreeSet<String>),
}

/// Extra WHERE conditions on top of `(tenant_id, id)`.
#[derive(Debug, Clone, Default)]
pub struct WriteGuard {
    pub expected_status: Option<OpportunityStatus>,
    pub score_below: Option<i32>,
}

impl WriteGuard {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn status_is(status: OpportunityStatus) -> Self {
        Self { expected_status: Some(status), ..Self::default() }
    }

    pub fn score_below(score: i32) -> Self {
        Self { score_below: Some(score), ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpportunityFilter {
    pub status: Option<OpportunityStatus>,
    pub assigned_to: Option<String>,
    pub needs_discussion: Option<bool>,
}
