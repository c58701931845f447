use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{requests::CreateTenantRequest, responses::TenantCreatedResponse};
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::handlers::auth::hash_password;
use crate::domain::models::{tenant::Tenant, user::{Role, User}};
use crate::domain::services::guards::require_non_empty;
use std::sync::Arc;
use crate::error::AppError;
use rand::{distributions::Alphanumeric, Rng};
use tracing::info;

/// Creates a tenant together with its first admin, whose secret is returned once.
pub async fn create_tenant(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CreateTenantRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = require_non_empty("name", &payload.name)?.to_string();
    let slug = require_non_empty("slug", &payload.slug)?.to_lowercase();

    if state.tenant_repo.find_by_slug(&slug).await?.is_some() {
        return Err(AppError::Conflict("Slug already taken".into()));
    }

    let created_tenant = state.tenant_repo.create(&Tenant::new(name, slug.clone())).await?;

    info!("Tenant created: {}", created_tenant.id);

    let admin_password: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();

    let admin_username = format!("{}-admin", slug);
    let admin_user = User::new(admin_username.clone(), hash_password(&admin_password)?)
        .bound(created_tenant.id.clone(), Role::Admin);
    state.user_repo.create(&admin_user).await?;

    Ok(Json(TenantCreatedResponse {
        tenant_id: created_tenant.id,
        admin_username,
        admin_secret: admin_password,
    }))
}

pub async fn get_tenant_by_slug(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = state.tenant_repo.find_by_slug(&slug).await?
        .ok_or(AppError::NotFound("Tenant not found".into()))?;

    Ok(Json(tenant))
}

pub async fn get_current_tenant(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let tenant_id = principal.tenant_id()?;
    let tenant = state.tenant_repo.find_by_id(tenant_id).await?
        .ok_or(AppError::NotFound("Tenant not found".into()))?;
    Ok(Json(tenant))
}
