use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{health, auth, tenant, member, invite, opportunity, goal};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/signup", post(auth::signup))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Tenants
        .route("/api/v1/tenants", post(tenant::create_tenant).get(tenant::get_current_tenant))
        .route("/api/v1/tenants/by-slug/{slug}", get(tenant::get_tenant_by_slug))
        .route("/api/v1/members", get(member::list_members))

        // Team onboarding
        .route("/api/v1/invite", post(invite::issue_invite).get(invite::check_invite))
        .route("/api/v1/invite/use", post(invite::redeem_invite))
        .route("/api/v1/invites", get(invite::list_invites))

        // Ingestion (public)
        .route("/api/v1/inbox/{slug}/opportunities", post(opportunity::submit_opportunity))

        // Triage
        .route("/api/v1/opportunities", get(opportunity::list_opportunities))
        .route("/api/v1/opportunities/{id}", get(opportunity::get_opportunity))
        .route("/api/v1/opportunities/{id}/actions", post(opportunity::apply_action))
        .route("/api/v1/opportunities/{id}/comments", get(opportunity::list_comments))
        .route("/api/v1/goals", get(goal::list_goals).post(goal::create_goal))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        tenant_id = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
