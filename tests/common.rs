#![allow(dead_code)]

use triage_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::factory::sqlite_repositories,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

pub struct TenantFixture {
    pub tenant_id: String,
    pub slug: String,
    pub admin: AuthHeaders,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

pub fn test_config(db_url: &str) -> Config {
    Config {
        database_url: db_url.to_string(),
        port: 0,
        jwt_secret_key: include_str!("../tests/keys/test_private.pem").to_string(),
        jwt_public_key: include_str!("../tests/keys/test_public.pem").to_string(),
        auth_issuer: "test-issuer".to_string(),
    }
}

pub async fn test_pool(db_filename: &str) -> Pool<Sqlite> {
    let db_url = format!("sqlite://{}?mode=rwc", db_filename);

    let connection_options = SqliteConnectOptions::from_str(&db_url)
        .unwrap()
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(10));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(connection_options)
        .await
        .expect("Failed to connect to test db");

    sqlx::migrate!("./migrations/sqlite")
        .run(&pool)
        .await
        .expect("Failed to migrate test db");

    pool
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub fn access_token_from(response: &Response) -> String {
    let cookies: Vec<String> = response.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|h| h.to_str().unwrap().to_string())
        .collect();

    let access_token_cookie = cookies.iter()
        .find(|c| c.contains("access_token="))
        .expect("No access_token cookie returned");

    let start = access_token_cookie.find("access_token=").unwrap() + 13;
    let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
    access_token_cookie[start..start + end].to_string()
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let pool = test_pool(&db_filename).await;
        let config = test_config(&format!("sqlite://{}", db_filename));

        let state = Arc::new(
            AppState::new(config, sqlite_repositories(pool.clone())).expect("Failed to build state")
        );
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn request(&self, method: &str, uri: &str, auth: Option<&AuthHeaders>, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.send(method, uri, auth, body).await;
        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn login(&self, username: &str, password: &str) -> AuthHeaders {
        let response = self.send(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        ).await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let access_token = access_token_from(&response);
        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token,
        }
    }

    pub async fn signup_and_login(&self, username: &str) -> AuthHeaders {
        let password = "correct-horse-battery";
        let (status, _) = self.request(
            "POST",
            "/api/v1/auth/signup",
            None,
            Some(json!({ "username": username, "password": password })),
        ).await;
        assert_eq!(status, StatusCode::CREATED, "signup failed for {}", username);
        self.login(username, password).await
    }

    pub async fn create_tenant(&self, slug: &str) -> TenantFixture {
        let (status, body) = self.request(
            "POST",
            "/api/v1/tenants",
            None,
            Some(json!({ "name": format!("{} inbox", slug), "slug": slug })),
        ).await;
        assert_eq!(status, StatusCode::OK);

        let tenant_id = body["tenant_id"].as_str().unwrap().to_string();
        let admin = self.login(
            body["admin_username"].as_str().unwrap(),
            body["admin_secret"].as_str().unwrap(),
        ).await;

        TenantFixture { tenant_id, slug: slug.to_string(), admin }
    }

    pub async fn issue_code(&self, admin: &AuthHeaders, role: &str) -> String {
        let (status, body) = self.request("POST", "/api/v1/invite", Some(admin), Some(json!({ "role": role }))).await;
        assert_eq!(status, StatusCode::CREATED, "issue failed: {}", body);
        body["code"].as_str().unwrap().to_string()
    }

    pub async fn redeem(&self, user: &AuthHeaders, code: &str) -> Response {
        self.send("POST", "/api/v1/invite/use", Some(user), Some(json!({ "code": code }))).await
    }

    /// Signs up a collaborator and joins them to the tenant with `role`.
    pub async fn onboard(&self, tenant: &TenantFixture, username: &str, role: &str) -> (String, AuthHeaders) {
        let unbound = self.signup_and_login(username).await;
        let code = self.issue_code(&tenant.admin, role).await;

        let response = self.redeem(&unbound, &code).await;
        assert_eq!(response.status(), StatusCode::OK);
        let access_token = access_token_from(&response);
        let body = parse_body(response).await;

        let auth = AuthHeaders {
            access_token,
            csrf_token: body["csrf_token"].as_str().unwrap().to_string(),
        };
        let (_, me) = self.request("GET", "/api/v1/members", Some(&auth), None).await;
        let user_id = me.as_array().unwrap().iter()
            .find(|m| m["username"] == username)
            .map(|m| m["id"].as_str().unwrap().to_string())
            .expect("onboarded user not listed as member");

        (user_id, auth)
    }

    pub async fn submit_opportunity(&self, slug: &str, content: &str) -> Value {
        let (status, body) = self.request(
            "POST",
            &format!("/api/v1/inbox/{}/opportunities", slug),
            None,
            Some(json!({ "sender_id": "ext-123", "sender_handle": "@brand", "content": content })),
        ).await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    pub async fn act(&self, auth: &AuthHeaders, opportunity_id: &str, action: Value) -> (StatusCode, Value) {
        self.request(
            "POST",
            &format!("/api/v1/opportunities/{}/actions", opportunity_id),
            Some(auth),
            Some(action),
        ).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
