use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;
use rand::Rng;

use super::user::Role;

pub const INVITE_CODE_LENGTH: usize = 8;
pub const INVITE_CODE_TTL_DAYS: i64 = 7;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct InviteCode {
    pub id: String,
    pub code: String,
    pub tenant_id: String,
    pub role: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub used_by: Option<String>,
}

impl InviteCode {
    pub fn new(tenant_id: String, role: Role, created_by: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            code: generate_code(),
            tenant_id,
            role: role.as_str().to_string(),
            created_by,
            created_at: now,
            expires_at: now + Duration::days(INVITE_CODE_TTL_DAYS),
            used_at: None,
            used_by: None,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_used() && !self.is_expired_at(now)
    }
}

pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..INVITE_CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        let code = generate_code();
        assert_eq!(code.len(), INVITE_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_expiry_is_seven_days_out() {
        let invite = InviteCode::new("t1".into(), Role::SupportAgent, "u1".into());
        assert_eq!(invite.expires_at - invite.created_at, Duration::days(7));
        assert!(invite.is_redeemable_at(invite.created_at));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let invite = InviteCode::new("t1".into(), Role::Admin, "u1".into());
        assert!(invite.is_expired_at(invite.expires_at));
        assert!(!invite.is_expired_at(invite.expires_at - Duration::milliseconds(1)));
    }
}
