use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use std::collections::HashMap;
use crate::state::AppState;
use crate::error::AppError;
use std::sync::Arc;

/// Tenant resolved from the public `{slug}` path segment.
pub struct TenantBySlug(pub String);

impl FromRequestParts<Arc<AppState>> for TenantBySlug {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let params: Path<HashMap<String, String>> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Validation("Invalid path".into()))?;

        let slug = params.get("slug")
            .ok_or_else(|| AppError::Validation("Missing tenant slug".into()))?;

        let tenant = state.tenant_repo.find_by_slug(slug).await?
            .ok_or_else(|| AppError::NotFound("Tenant not found".into()))?;

        tracing::Span::current().record("tenant_id", tenant.id.as_str());
        Ok(TenantBySlug(tenant.id))
    }
}
