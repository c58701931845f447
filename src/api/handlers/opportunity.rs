use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::{ApiJson, ApiQuery}, tenant::TenantBySlug};
use crate::api::dtos::requests::SubmitOpportunityRequest;
use crate::domain::models::{
    action::Action,
    opportunity::{NewOpportunityParams, OpportunityFilter},
};
use crate::error::AppError;
use std::sync::Arc;

const SOURCES: [&str; 2] = ["widget", "platform"];

pub async fn apply_action(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(opportunity_id): Path<String>,
    ApiJson(action): ApiJson<Action>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.dispatcher.dispatch(&principal, &opportunity_id, action).await?;
    Ok(Json(updated))
}

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(opportunity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let comments = state.dispatcher.comments(&principal, &opportunity_id).await?;
    Ok(Json(comments))
}

pub async fn get_opportunity(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    Path(opportunity_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let opportunity = state.dispatcher.get(&principal, &opportunity_id).await?;
    Ok(Json(opportunity))
}

pub async fn list_opportunities(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    ApiQuery(filter): ApiQuery<OpportunityFilter>,
) -> Result<impl IntoResponse, AppError> {
    let opportunities = state.dispatcher.list(&principal, &filter).await?;
    Ok(Json(opportunities))
}

/// Public widget submission into a tenant's inbox.
pub async fn submit_opportunity(
    State(state): State<Arc<AppState>>,
    TenantBySlug(tenant_id): TenantBySlug,
    ApiJson(payload): ApiJson<SubmitOpportunityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let source = payload.source.unwrap_or_else(|| "widget".to_string());
    if !SOURCES.contains(&source.as_str()) {
        return Err(AppError::Validation(format!("Unknown source: {}", source)));
    }

    let created = state.dispatcher.ingest(NewOpportunityParams {
        tenant_id,
        sender_id: payload.sender_id,
        sender_handle: payload.sender_handle,
        content: payload.content,
        source,
    }).await?;

    Ok((StatusCode::CREATED, Json(created)))
}
