use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://triage.app/claims/tenant_id", default)]
    pub tenant_id: Option<String>,

    #[serde(rename = "https://triage.app/claims/role", default)]
    pub role: Option<String>,

    #[serde(rename = "https://triage.app/claims/csrf")]
    pub csrf_token: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub csrf_token: String,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub role: Option<String>,
    pub tenant_id: Option<String>,
}
