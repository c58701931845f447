use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::requests::CreateGoalRequest;
use crate::domain::models::{goal::Goal, user::Role};
use crate::domain::services::guards::require_non_empty;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ApiJson(payload): ApiJson<CreateGoalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = principal.tenant_id()?;
    if principal.has_role(Role::SupportAgent) {
        return Err(AppError::Forbidden("Support agents cannot define goals".into()));
    }
    let name = require_non_empty("name", &payload.name)?;

    let goal = Goal::new(tenant_id.to_string(), name.to_string(), payload.description);
    let created = state.goal_repo.create(&goal).await?;
    info!("Created goal: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let goals = state.goal_repo.list(principal.tenant_id()?).await?;
    Ok(Json(goals))
}
