use std::sync::Arc;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::models::{
    invite_code::InviteCode,
    principal::PrincipalContext,
    user::Role,
};
use crate::domain::ports::InviteCodeRepository;
use crate::error::{is_unique_violation, AppError};

const MAX_ISSUE_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Redemption {
    pub role: Role,
    pub tenant_id: String,
}

/// Issues, checks and redeems invite codes with exactly-once redemption.
pub struct InviteCodeRegistry {
    repo: Arc<dyn InviteCodeRepository>,
}

impl InviteCodeRegistry {
    pub fn new(repo: Arc<dyn InviteCodeRepository>) -> Self {
        Self { repo }
    }

    pub async fn issue(&self, principal: &PrincipalContext, role: Role) -> Result<InviteCode, AppError> {
        principal.require_role(Role::Admin)?;
        let tenant_id = principal.tenant_id()?;

        if !role.is_invite_issuable() {
            return Err(AppError::Validation(format!("Role {} cannot be granted by invite", role)));
        }

        // The store's unique index is the authoritative collision guard.
        for attempt in 1..=MAX_ISSUE_ATTEMPTS {
            let invite = InviteCode::new(tenant_id.to_string(), role, principal.user_id.clone());
            match self.repo.create(&invite).await {
                Ok(created) => {
                    info!(tenant_id = %tenant_id, role = %role, "Issued invite code");
                    return Ok(created);
                }
                Err(AppError::Database(e)) if is_unique_violation(&e) => {
                    warn!("Invite code collision on attempt {}, regenerating", attempt);
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::InternalWithMsg(format!(
            "Could not generate a unique invite code after {} attempts",
            MAX_ISSUE_ATTEMPTS
        )))
    }

    /// Pre-flight check for the UI. Not an authorization decision; `redeem` is.
    pub async fn check(&self, code: &str) -> Result<bool, AppError> {
        let invite = self.repo.find_by_code(code.trim()).await?;
        Ok(invite.map(|i| i.is_redeemable_at(Utc::now())).unwrap_or(false))
    }

    pub async fn redeem(&self, principal: &PrincipalContext, code: &str) -> Result<Redemption, AppError> {
        if principal.has_role(Role::Celebrity) {
            return Err(AppError::Forbidden("Tenant owners cannot join another team".into()));
        }

        let code = code.trim();
        let invite = self.repo.find_by_code(code).await?
            .ok_or(AppError::CodeNotFound)?;

        let now = Utc::now();
        if invite.is_expired_at(now) {
            return Err(AppError::ExpiredCode);
        }
        if invite.is_used() {
            return Err(AppError::AlreadyUsed);
        }

        let role: Role = invite.role.parse().map_err(AppError::InternalWithMsg)?;

        let consumed = self.repo
            .consume_and_grant(code, &principal.user_id, role, &invite.tenant_id, now)
            .await?;

        match consumed {
            Some(used) => {
                info!(
                    tenant_id = %used.tenant_id,
                    user_id = %principal.user_id,
                    role = %role,
                    "Invite code redeemed"
                );
                Ok(Redemption { role, tenant_id: used.tenant_id })
            }
            None => {
                // Lost the `used_at IS NULL` guard to a concurrent redeemer.
                let current = self.repo.find_by_code(code).await?;
                warn!(user_id = %principal.user_id, "Invite code redemption lost the race");
                match current {
                    Some(c) if c.is_used() => Err(AppError::AlreadyUsed),
                    Some(_) => Err(AppError::Conflict("Invite code changed concurrently, try again".into())),
                    None => Err(AppError::CodeNotFound),
                }
            }
        }
    }

    pub async fn list(&self, principal: &PrincipalContext) -> Result<Vec<InviteCode>, AppError> {
        principal.require_role(Role::Admin)?;
        self.repo.list_by_tenant(principal.tenant_id()?).await
    }
}
