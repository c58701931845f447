use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, Method},
};
use crate::state::AppState;
use crate::domain::models::principal::PrincipalContext;
use crate::error::AppError;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

/// Resolves the caller into a `PrincipalContext` from the access-token cookie.
/// Mutating requests must echo the token's CSRF value in `X-CSRF-Token`.
pub struct AuthUser(pub PrincipalContext);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or_else(|| AppError::InternalWithMsg("CookieManagerLayer missing".into()))?;

        let access_token = cookies.get("access_token")
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_string();

        let csrf = if matches!(parts.method, Method::GET | Method::HEAD | Method::OPTIONS) {
            None
        } else {
            let header = parts.headers.get("X-CSRF-Token")
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| AppError::Forbidden("Missing CSRF token".into()))?;
            Some(header)
        };

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let principal = app_state.auth_service.resolve(&access_token, csrf)?;

        if let Some(tenant_id) = &principal.tenant_id {
            Span::current().record("tenant_id", tenant_id.as_str());
        }
        Span::current().record("user_id", principal.user_id.as_str());

        Ok(AuthUser(principal))
    }
}
