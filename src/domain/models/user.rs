use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Celebrity,
    Admin,
    SupportAgent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Celebrity => "celebrity",
            Role::Admin => "admin",
            Role::SupportAgent => "support_agent",
        }
    }

    /// The tenant owner role is bound at tenant creation and never handed out by code.
    pub fn is_invite_issuable(&self) -> bool {
        matches!(self, Role::Admin | Role::SupportAgent)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "celebrity" => Ok(Role::Celebrity),
            "admin" => Ok(Role::Admin),
            "support_agent" => Ok(Role::SupportAgent),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub tenant_id: Option<String>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// A collaborator account that has not joined any tenant yet.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            tenant_id: None,
            role: None,
            created_at: Utc::now(),
        }
    }

    pub fn bound(mut self, tenant_id: String, role: Role) -> Self {
        self.tenant_id = Some(tenant_id);
        self.role = Some(role.as_str().to_string());
        self
    }

    pub fn parsed_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }
}
