use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};

use crate::domain::models::{
    action::Action,
    comment::OpportunityComment,
    opportunity::{
        NewOpportunityParams, Opportunity, OpportunityChange, OpportunityFilter,
        OpportunityStatus, WriteGuard, UNCLASSIFIED_SCORE,
    },
    principal::PrincipalContext,
};
use crate::domain::ports::{CommentRepository, GoalRepository, OpportunityRepository, UserRepository};
use crate::domain::services::guards::{
    check_transition, is_valid_score, require_non_empty, require_pending, validate_score_upgrade,
};
use crate::error::AppError;

/// Validates and applies typed actions to opportunities of the caller's tenant.
pub struct OpportunityActionDispatcher {
    opportunities: Arc<dyn OpportunityRepository>,
    goals: Arc<dyn GoalRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl OpportunityActionDispatcher {
    pub fn new(
        opportunities: Arc<dyn OpportunityRepository>,
        goals: Arc<dyn GoalRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self { opportunities, goals, users, comments }
    }

    pub async fn dispatch(
        &self,
        principal: &PrincipalContext,
        opportunity_id: &str,
        action: Action,
    ) -> Result<Opportunity, AppError> {
        let tenant_id = principal.tenant_id()?;
        let current = self.load(tenant_id, opportunity_id).await?;
        let status = current.current_status().map_err(AppError::InternalWithMsg)?;
        let kind = action.kind();

        let (change, guard) = match action {
            Action::UpgradeRelevance { score, explanation } => {
                let explanation = require_non_empty("explanation", &explanation)?;
                validate_score_upgrade(current.relevance_score, score)?;
                (
                    OpportunityChange::Relevance {
                        score,
                        explanation: explanation.to_string(),
                        by: principal.user_id.clone(),
                    },
                    WriteGuard::score_below(score),
                )
            }
            Action::DowngradeRelevance { explanation } => {
                let explanation = require_non_empty("explanation", &explanation)?;
                require_pending(status, kind)?;
                (
                    OpportunityChange::Relevance {
                        score: UNCLASSIFIED_SCORE,
                        explanation: explanation.to_string(),
                        by: principal.user_id.clone(),
                    },
                    WriteGuard::status_is(OpportunityStatus::Pending),
                )
            }
            Action::AssignGoal { goal_id } => {
                self.goals.find_by_id(tenant_id, &goal_id).await?
                    .ok_or_else(|| AppError::NotFound("Goal not found".into()))?;
                (OpportunityChange::Goal(goal_id), WriteGuard::none())
            }
            Action::AssignUser { user_id } => {
                self.users.find_in_tenant(tenant_id, &user_id).await?
                    .ok_or_else(|| AppError::NotFound("User not found".into()))?;
                (OpportunityChange::Assignee(user_id), WriteGuard::none())
            }
            Action::FlagDiscussion { needs_discussion } => {
                (OpportunityChange::Discussion(needs_discussion), WriteGuard::none())
            }
            Action::UpdateStatus { status: next } => {
                check_transition(status, next)?;
                (
                    OpportunityChange::Status { to: next, by: principal.user_id.clone() },
                    WriteGuard::status_is(status),
                )
            }
            // Comments live in their own table; the opportunity row, including
            // `updated_at`, is left as is.
            Action::AddComment { content } => {
                let content = require_non_empty("content", &content)?;
                let comment = OpportunityComment::new(
                    tenant_id.to_string(),
                    current.id.clone(),
                    principal.user_id.clone(),
                    content.to_string(),
                );
                let created = self.comments.create(&comment).await?;
                info!(opportunity_id = %current.id, comment_id = %created.id, "Comment added");
                return Ok(current);
            }
            Action::UpdateTags { tags } => (OpportunityChange::Tags(tags), WriteGuard::none()),
        };

        let updated = self.opportunities
            .apply_change(tenant_id, opportunity_id, &change, &guard, Utc::now())
            .await?;

        match updated {
            Some(opportunity) => {
                info!(
                    opportunity_id = %opportunity.id,
                    action = kind,
                    user_id = %principal.user_id,
                    "Opportunity action applied"
                );
                Ok(opportunity)
            }
            None => {
                let latest = self.load(tenant_id, opportunity_id).await?;
                warn!(
                    opportunity_id = %opportunity_id,
                    action = kind,
                    observed_status = %latest.status,
                    "Opportunity changed concurrently, guard lost"
                );
                Err(AppError::Conflict(format!(
                    "Opportunity was modified concurrently (status is now {}, relevance {})",
                    latest.status, latest.relevance_score
                )))
            }
        }
    }

    pub async fn get(&self, principal: &PrincipalContext, opportunity_id: &str) -> Result<Opportunity, AppError> {
        self.load(principal.tenant_id()?, opportunity_id).await
    }

    pub async fn list(&self, principal: &PrincipalContext, filter: &OpportunityFilter) -> Result<Vec<Opportunity>, AppError> {
        self.opportunities.list(principal.tenant_id()?, filter).await
    }

    pub async fn comments(&self, principal: &PrincipalContext, opportunity_id: &str) -> Result<Vec<OpportunityComment>, AppError> {
        let tenant_id = principal.tenant_id()?;
        self.load(tenant_id, opportunity_id).await?;
        self.comments.list_by_opportunity(tenant_id, opportunity_id).await
    }

    /// Entry point for ingestion collaborators (widget submissions, platform callbacks).
    pub async fn ingest(&self, params: NewOpportunityParams) -> Result<Opportunity, AppError> {
        require_non_empty("sender_id", &params.sender_id)?;
        require_non_empty("content", &params.content)?;
        let opportunity = Opportunity::new(params);
        let created = self.opportunities.create(&opportunity).await?;
        info!(tenant_id = %created.tenant_id, opportunity_id = %created.id, source = %created.source, "Opportunity ingested");
        Ok(created)
    }

    async fn load(&self, tenant_id: &str, opportunity_id: &str) -> Result<Opportunity, AppError> {
        let opportunity = self.opportunities.find_by_id(tenant_id, opportunity_id).await?
            .ok_or_else(|| AppError::NotFound("Opportunity not found".into()))?;

        if !is_valid_score(opportunity.relevance_score) {
            return Err(AppError::InternalWithMsg(format!(
                "Opportunity {} has out-of-range relevance score {}",
                opportunity.id, opportunity.relevance_score
            )));
        }
        Ok(opportunity)
    }
}
