use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::responses::MemberResponse;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let members = state.user_repo.list_by_tenant(principal.tenant_id()?).await?;
    let safe_members: Vec<MemberResponse> = members.into_iter().map(MemberResponse::from).collect();

    Ok(Json(safe_members))
}
