use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::{invite_code::InviteCode, user::{Role, User}};

#[derive(Serialize)]
pub struct TenantCreatedResponse {
    pub tenant_id: String,
    pub admin_username: String,
    pub admin_secret: String,
}

#[derive(Serialize)]
pub struct InviteIssuedResponse {
    pub code: String,
    pub role: String,
    pub expires_at: DateTime<Utc>,
}

impl From<InviteCode> for InviteIssuedResponse {
    fn from(invite: InviteCode) -> Self {
        Self {
            code: invite.code,
            role: invite.role,
            expires_at: invite.expires_at,
        }
    }
}

#[derive(Serialize)]
pub struct InviteCheckResponse {
    pub valid: bool,
}

#[derive(Serialize)]
pub struct InviteRedeemedResponse {
    pub role: Role,
    pub tenant_id: String,
    pub csrf_token: String,
}

#[derive(Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub username: String,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for MemberResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            created_at: u.created_at,
        }
    }
}
