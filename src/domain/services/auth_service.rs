use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::models::{auth::Claims, principal::PrincipalContext, user::{Role, User}};
use crate::error::AppError;

pub const TOKEN_AUDIENCE: &str = "triage-frontend";
const SESSION_TTL_HOURS: i64 = 12;

/// A signed access token and the CSRF value embedded in its claims.
pub struct Session {
    pub access_token: String,
    pub csrf_token: String,
}

/// Mints access tokens that carry the user's tenant binding and turns them
/// back into a `PrincipalContext`. Sessions are stateless; a changed binding
/// only shows up in tokens issued after the change.
pub struct AuthService {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_ed_pem(config.jwt_secret_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT private key PEM: {}", e)))?;
        let decoding_key = DecodingKey::from_ed_pem(config.jwt_public_key.as_bytes())
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid JWT public key PEM: {}", e)))?;

        Ok(Self {
            issuer: config.auth_issuer.clone(),
            encoding_key,
            decoding_key,
        })
    }

    pub fn issue(&self, user: &User) -> Result<Session, AppError> {
        let csrf_token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(32).map(char::from).collect();
        let now = Utc::now();

        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user.id.clone(),
            aud: TOKEN_AUDIENCE.to_string(),
            exp: (now + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
            tenant_id: user.tenant_id.clone(),
            role: user.role.clone(),
            csrf_token: csrf_token.clone(),
        };

        let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!("JWT encoding failed: {}", e);
                AppError::Internal
            })?;

        Ok(Session { access_token, csrf_token })
    }

    /// Verifies the token and, for state-changing requests, that `csrf`
    /// echoes the value bound into it. Pass `None` for safe methods.
    pub fn resolve(&self, access_token: &str, csrf: Option<&str>) -> Result<PrincipalContext, AppError> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let claims = decode::<Claims>(access_token, &self.decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?
            .claims;

        if let Some(presented) = csrf {
            if presented != claims.csrf_token {
                return Err(AppError::Forbidden("CSRF token mismatch".into()));
            }
        }

        let role = claims.role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(|_| AppError::Unauthorized)?;

        Ok(PrincipalContext::new(claims.sub, role, claims.tenant_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(&Config {
            database_url: "sqlite::memory:".into(),
            port: 0,
            jwt_secret_key: include_str!("../../../tests/keys/test_private.pem").into(),
            jwt_public_key: include_str!("../../../tests/keys/test_public.pem").into(),
            auth_issuer: "test-issuer".into(),
        })
        .unwrap()
    }

    #[test]
    fn test_issued_token_resolves_to_binding() {
        let auth = service();
        let user = User::new("agent".into(), "hash".into()).bound("t1".into(), Role::SupportAgent);

        let session = auth.issue(&user).unwrap();
        let principal = auth.resolve(&session.access_token, Some(&session.csrf_token)).unwrap();

        assert_eq!(principal.user_id, user.id);
        assert_eq!(principal.role, Some(Role::SupportAgent));
        assert_eq!(principal.tenant_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_unbound_user_has_no_tenant() {
        let auth = service();
        let session = auth.issue(&User::new("new".into(), "hash".into())).unwrap();

        let principal = auth.resolve(&session.access_token, None).unwrap();
        assert!(principal.role.is_none());
        assert!(principal.tenant_id.is_none());
    }

    #[test]
    fn test_csrf_mismatch_is_forbidden() {
        let auth = service();
        let session = auth.issue(&User::new("new".into(), "hash".into())).unwrap();

        let err = auth.resolve(&session.access_token, Some("forged")).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_tampered_token_is_unauthorized() {
        let auth = service();
        let session = auth.issue(&User::new("new".into(), "hash".into())).unwrap();
        let tampered = format!("{}x", session.access_token);

        assert!(matches!(auth.resolve(&tampered, None), Err(AppError::Unauthorized)));
    }
}
