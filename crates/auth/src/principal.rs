use serde::{Deserialize, Serialize};

use haulnet_core::ActorId;

use crate::Role;

/// A verified `{actor, role}` fact, as resolved from a credential.
///
/// Every state-machine operation takes one of these; nothing downstream
/// re-checks the credential.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    actor_id: ActorId,
    role: Role,
}

impl Principal {
    pub fn new(actor_id: ActorId, role: Role) -> Self {
        Self { actor_id, role }
    }

    pub fn shipper(actor_id: ActorId) -> Self {
        Self::new(actor_id, Role::Shipper)
    }

    pub fn driver(actor_id: ActorId) -> Self {
        Self::new(actor_id, Role::Driver)
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
