mod common;
use common::{access_token_from, parse_body, TestApp};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

#[tokio::test]
async fn test_admin_issues_code_with_defaults() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("nova").await;

    let before = Utc::now();
    let (status, body) = app.request("POST", "/api/v1/invite", Some(&tenant.admin), Some(json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let code = body["code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    assert_eq!(body["role"], "support_agent");

    let expires_at: chrono::DateTime<Utc> = serde_json::from_value(body["expires_at"].clone()).unwrap();
    assert!(expires_at >= before + Duration::days(7) - Duration::seconds(5));
    assert!(expires_at <= Utc::now() + Duration::days(7));
}

#[tokio::test]
async fn test_issue_requires_admin() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("nova").await;
    let (_, agent) = app.onboard(&tenant, "agent1", "support_agent").await;

    let (status, body) = app.request("POST", "/api/v1/invite", Some(&agent), Some(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "forbidden");

    let (status, body) = app.request("POST", "/api/v1/invite", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "unauthorized");
    assert_eq!(body["error"], "Unauthorized");

    let unbound = app.signup_and_login("drifter").await;
    let (status, _) = app.request("POST", "/api/v1/invite", Some(&unbound), Some(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_celebrity_role_cannot_be_issued() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("nova").await;

    let (status, body) = app.request("POST", "/api/v1/invite", Some(&tenant.admin), Some(json!({ "role": "celebrity" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
}

#[tokio::test]
async fn test_check_reports_validity_without_side_effects() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("nova").await;
    let code = app.issue_code(&tenant.admin, "admin").await;

    for _ in 0..2 {
        let (status, body) = app.request("GET", &format!("/api/v1/invite?code={}", code), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], true);
    }

    let (_, body) = app.request("GET", "/api/v1/invite?code=ZZZZZZZZ", None, None).await;
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn test_redeem_binds_user_and_reissues_session() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("nova").await;
    let code = app.issue_code(&tenant.admin, "support_agent").await;

    let collaborator = app.signup_and_login("collab").await;
    let (status, _) = app.request("GET", "/api/v1/opportunities", Some(&collaborator), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let response = app.redeem(&collaborator, &code).await;
    assert_eq!(response.status(), StatusCode::OK);
    let access_token = access_token_from(&response);
    let body = parse_body(response).await;
    assert_eq!(body["role"], "support_agent");
    assert_eq!(body["tenant_id"], tenant.tenant_id);

    let rebound = common::AuthHeaders {
        access_token,
        csrf_token: body["csrf_token"].as_str().unwrap().to_string(),
    };
    let (status, _) = app.request("GET", "/api/v1/opportunities", Some(&rebound), None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, check) = app.request("GET", &format!("/api/v1/invite?code={}", code), None, None).await;
    assert_eq!(check["valid"], false);

    let stored: (Option<String>, Option<String>) = sqlx::query_as("SELECT role, tenant_id FROM users WHERE username = 'collab'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(stored.0.as_deref(), Some("support_agent"));
    assert_eq!(stored.1.as_deref(), Some(tenant.tenant_id.as_str()));
}

#[tokio::test]
async fn test_second_redeem_is_already_used() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("nova").await;
    let code = app.issue_code(&tenant.admin, "support_agent").await;

    let first = app.signup_and_login("first").await;
    let second = app.signup_and_login("second").await;

    assert_eq!(app.redeem(&first, &code).await.status(), StatusCode::OK);

    let response = app.redeem(&second, &code).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["kind"], "already_used");

    let (role, tenant_id): (Option<String>, Option<String>) = sqlx::query_as("SELECT role, tenant_id FROM users WHERE username = 'second'")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(role.is_none());
    assert!(tenant_id.is_none());
}

#[tokio::test]
async fn test_expired_code_is_rejected_and_stays_unused() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("nova").await;
    let code = app.issue_code(&tenant.admin, "support_agent").await;

    sqlx::query("UPDATE invite_codes SET expires_at = ? WHERE code = ?")
        .bind(Utc::now() - Duration::seconds(1))
        .bind(&code)
        .execute(&app.pool)
        .await
        .unwrap();

    let (_, check) = app.request("GET", &format!("/api/v1/invite?code={}", code), None, None).await;
    assert_eq!(check["valid"], false);

    let user = app.signup_and_login("late").await;
    let response = app.redeem(&user, &code).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["kind"], "expired_code");

    let used_at: (Option<chrono::DateTime<Utc>>,) = sqlx::query_as("SELECT used_at FROM invite_codes WHERE code = ?")
        .bind(&code)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(used_at.0.is_none());
}

#[tokio::test]
async fn test_unknown_code_is_not_found() {
    let app = TestApp::new().await;
    let user = app.signup_and_login("guess").await;

    let response = app.redeem(&user, "NOPE0000").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(parse_body(response).await["kind"], "not_found");
}

#[tokio::test]
async fn test_admin_lists_issued_codes() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("nova").await;
    let other = app.create_tenant("orbit").await;

    app.issue_code(&tenant.admin, "support_agent").await;
    app.issue_code(&tenant.admin, "admin").await;
    app.issue_code(&other.admin, "support_agent").await;

    let (status, body) = app.request("GET", "/api/v1/invites", Some(&tenant.admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let codes = body.as_array().unwrap();
    assert_eq!(codes.len(), 2);
    assert!(codes.iter().all(|c| c["tenant_id"] == tenant.tenant_id));
}

#[tokio::test]
async fn test_issue_rejects_unknown_role_payload() {
    let app = TestApp::new().await;
    let tenant = app.create_tenant("nova").await;

    let (status, body) = app.request("POST", "/api/v1/invite", Some(&tenant.admin), Some(json!({ "role": "owner" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");

    let (status, body) = app.request("GET", "/api/v1/invite", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "validation_error");
}
