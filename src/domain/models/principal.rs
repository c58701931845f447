use serde::{Deserialize, Serialize};

use super::user::Role;
use crate::error::AppError;

/// The authenticated caller, resolved once per request and passed explicitly
/// into every registry and dispatcher call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalContext {
    pub user_id: String,
    pub role: Option<Role>,
    pub tenant_id: Option<String>,
}

impl PrincipalContext {
    pub fn new(user_id: String, role: Option<Role>, tenant_id: Option<String>) -> Self {
        Self { user_id, role, tenant_id }
    }

    pub fn tenant_id(&self) -> Result<&str, AppError> {
        self.tenant_id
            .as_deref()
            .ok_or_else(|| AppError::Forbidden("Account is not a member of any team".into()))
    }

    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == Some(role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("Requires the {} role", role)))
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbound_principal_is_forbidden() {
        let p = PrincipalContext::new("u1".into(), None, None);
        assert!(matches!(p.tenant_id(), Err(AppError::Forbidden(_))));
        assert!(p.require_role(Role::Admin).is_err());
    }

    #[test]
    fn test_role_requirement() {
        let p = PrincipalContext::new("u1".into(), Some(Role::SupportAgent), Some("t1".into()));
        assert_eq!(p.tenant_id().unwrap(), "t1");
        assert!(p.require_role(Role::Admin).is_err());
        assert!(p.require_role(Role::SupportAgent).is_ok());
    }
}
