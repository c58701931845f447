use crate::domain::models::{
    tenant::Tenant, user::{User, Role}, invite_code::InviteCode,
    opportunity::{Opportunity, OpportunityChange, OpportunityFilter, WriteGuard},
    goal::Goal, comment::OpportunityComment,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Tenant>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_in_tenant(&self, tenant_id: &str, id: &str) -> Result<Option<User>, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait InviteCodeRepository: Send + Sync {
    /// Plain insert. A duplicate `code` surfaces as a unique-violation database error.
    async fn create(&self, invite: &InviteCode) -> Result<InviteCode, AppError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<InviteCode>, AppError>;
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<InviteCode>, AppError>;

    /// Marks the code used and grants `role`/`tenant_id` to `user_id` in one
    /// transaction. The code update is guarded by `used_at IS NULL`; returns
    /// `Ok(None)` when that guard matched no row. If the grant fails nothing
    /// is committed and the code stays unused.
    async fn consume_and_grant(
        &self,
        code: &str,
        user_id: &str,
        role: Role,
        tenant_id: &str,
        used_at: DateTime<Utc>,
    ) -> Result<Option<InviteCode>, AppError>;
}

#[async_trait]
pub trait OpportunityRepository: Send + Sync {
    async fn create(&self, opportunity: &Opportunity) -> Result<Opportunity, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Opportunity>, AppError>;
    async fn list(&self, tenant_id: &str, filter: &OpportunityFilter) -> Result<Vec<Opportunity>, AppError>;

    /// Single conditional UPDATE keyed by `(tenant_id, id)` plus `guard`.
    /// Always sets `updated_at = now`. Returns `Ok(None)` when no row matched.
    async fn apply_change(
        &self,
        tenant_id: &str,
        id: &str,
        change: &OpportunityChange,
        guard: &WriteGuard,
        now: DateTime<Utc>,
    ) -> Result<Option<Opportunity>, AppError>;
}

#[async_trait]
pub trait GoalRepository: Send + Sync {
    async fn create(&self, goal: &Goal) -> Result<Goal, AppError>;
    async fn find_by_id(&self, tenant_id: &str, id: &str) -> Result<Option<Goal>, AppError>;
    async fn list(&self, tenant_id: &str) -> Result<Vec<Goal>, AppError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &OpportunityComment) -> Result<OpportunityComment, AppError>;
    async fn list_by_opportunity(&self, tenant_id: &str, opportunity_id: &str) -> Result<Vec<OpportunityComment>, AppError>;
}
