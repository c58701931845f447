use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::{ApiJson, ApiQuery}};
use crate::api::dtos::{
    requests::{CheckInviteQuery, IssueInviteRequest, RedeemInviteRequest},
    responses::{InviteCheckResponse, InviteIssuedResponse, InviteRedeemedResponse},
};
use crate::api::handlers::auth::set_session_cookie;
use crate::domain::models::user::Role;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::info;

pub async fn issue_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ApiJson(payload): ApiJson<IssueInviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = payload.role.unwrap_or(Role::SupportAgent);
    let invite = state.invite_registry.issue(&principal, role).await?;
    Ok((StatusCode::CREATED, Json(InviteIssuedResponse::from(invite))))
}

pub async fn check_invite(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<CheckInviteQuery>,
) -> Result<impl IntoResponse, AppError> {
    let valid = state.invite_registry.check(&query.code).await?;
    Ok(Json(InviteCheckResponse { valid }))
}

pub async fn redeem_invite(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    ApiJson(payload): ApiJson<RedeemInviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let redemption = state.invite_registry.redeem(&principal, &payload.code).await?;

    // The caller's access token predates the grant; hand out one with the new binding.
    let user = state.user_repo.find_by_id(&principal.user_id).await?
        .ok_or(AppError::Unauthorized)?;
    let session = state.auth_service.issue(&user)?;
    set_session_cookie(&cookies, &session);

    info!("User {} joined tenant {}", user.id, redemption.tenant_id);

    Ok(Json(InviteRedeemedResponse {
        role: redemption.role,
        tenant_id: redemption.tenant_id,
        csrf_token: session.csrf_token,
    }))
}

pub async fn list_invites(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let invites = state.invite_registry.list(&principal).await?;
    Ok(Json(invites))
}
