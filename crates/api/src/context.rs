use chrono::{DateTime, Utc};

use haulnet_auth::{Principal, Role};
use haulnet_core::ActorId;

/// Authenticated caller for a request.
///
/// Inserted by the auth middleware; every protected handler reads it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
    expires_at: DateTime<Utc>,
}

impl PrincipalContext {
    pub fn new(principal: Principal, expires_at: DateTime<Utc>) -> Self {
        Self { principal, expires_at }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn actor_id(&self) -> ActorId {
        self.principal.actor_id()
    }

    pub fn role(&self) -> Role {
        self.principal.role()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}
