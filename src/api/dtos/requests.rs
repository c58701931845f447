use crate::domain::models::user::Role;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Default)]
pub struct IssueInviteRequest {
    pub role: Option<Role>,
}

#[derive(Deserialize)]
pub struct CheckInviteQuery {
    pub code: String,
}

#[derive(Deserialize)]
pub struct RedeemInviteRequest {
    pub code: String,
}

#[derive(Deserialize)]
pub struct CreateGoalRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct SubmitOpportunityRequest {
    pub sender_id: String,
    pub sender_handle: String,
    pub content: String,
    pub source: Option<String>,
}
