use axum::{extract::State, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::extractors::json::ApiJson;
use crate::api::dtos::requests::{LoginRequest, SignupRequest};
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::User;
use crate::domain::services::{auth_service::Session, guards::require_non_empty};
use std::sync::Arc;
use tower_cookies::{Cookies, Cookie};
use tower_cookies::cookie::SameSite;
use time::Duration;
use argon2::{password_hash::{SaltString, PasswordHasher}, PasswordHash, Argon2, PasswordVerifier};
use rand::rngs::OsRng;
use tracing::info;

const MIN_PASSWORD_LENGTH: usize = 8;

pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = require_non_empty("username", &payload.username)?.to_string();
    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH)));
    }

    if state.user_repo.find_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let created = state.user_repo.create(&User::new(username, password_hash)).await?;

    info!("Signed up user: {}", created.id);

    Ok((StatusCode::CREATED, Json(profile(&created))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_username(&payload.username).await?
        .ok_or(AppError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal)?;

    Argon2::default().verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)?;

    let session = state.auth_service.issue(&user)?;
    set_session_cookie(&cookies, &session);

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token: session.csrf_token,
        user: profile(&user),
    }))
}

/// Sessions are stateless; logging out only drops the cookie.
pub async fn logout(cookies: Cookies) -> StatusCode {
    cookies.remove(Cookie::build(("access_token", "")).path("/").into());
    StatusCode::NO_CONTENT
}

pub(crate) fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::Internal)
}

pub(crate) fn profile(user: &User) -> UserProfile {
    UserProfile {
        id: user.id.clone(),
        username: user.username.clone(),
        role: user.role.clone(),
        tenant_id: user.tenant_id.clone(),
    }
}

pub(crate) fn set_session_cookie(cookies: &Cookies, session: &Session) {
    let mut access_c = Cookie::new("access_token", session.access_token.clone());
    access_c.set_http_only(true);
    access_c.set_secure(true);
    access_c.set_same_site(SameSite::Strict);
    access_c.set_path("/");
    access_c.set_max_age(Duration::hours(12));
    cookies.add(access_c);
}
