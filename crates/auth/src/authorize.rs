//! Authorization policy for job operations.
//!
//! Pure predicates over `(role, actor, job parties)`. No IO, no state. Whether a
//! transition is legal *now* is a state-machine question and surfaces as a
//! conflict, not as an authorization failure. The one status-derived input is
//! `JobParties::open`, which only decides visibility.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use haulnet_core::{ActorId, DomainError};

use crate::{Principal, Role};

/// Who is attached to a job, as far as authorization is concerned.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParties {
    pub shipper_id: ActorId,
    pub driver_id: Option<ActorId>,
    /// Job is `open` and can still be picked up by any driver.
    pub open: bool,
}

impl JobParties {
    pub fn is_shipper(&self, actor: ActorId) -> bool {
        self.shipper_id == actor
    }

    pub fn is_assigned_driver(&self, actor: ActorId) -> bool {
        self.driver_id == Some(actor)
    }
}

/// Every operation the core exposes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation<'a> {
    CreateJob,
    AcceptJob,
    RejectJob(&'a JobParties),
    StartJob(&'a JobParties),
    CompleteJob(&'a JobParties),
    CancelJob(&'a JobParties),
    RateJob(&'a JobParties),
    ViewJob(&'a JobParties),
    ReportLocation(&'a JobParties),
    ViewLocation(&'a JobParties),
    ListJobs,
    InitiateContact,
    ListEngagements,
}

impl Operation<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::CreateJob => "create_job",
            Operation::AcceptJob => "accept_job",
            Operation::RejectJob(_) => "reject_job",
            Operation::StartJob(_) => "start_job",
            Operation::CompleteJob(_) => "complete_job",
            Operation::CancelJob(_) => "cancel_job",
            Operation::RateJob(_) => "rate_job",
            Operation::ViewJob(_) => "view_job",
            Operation::ReportLocation(_) => "report_location",
            Operation::ViewLocation(_) => "view_location",
            Operation::ListJobs => "list_jobs",
            Operation::InitiateContact => "initiate_contact",
            Operation::ListEngagements => "list_engagements",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("{operation} requires the {required} role")]
    RoleRequired {
        operation: &'static str,
        required: Role,
    },

    #[error("{0} is restricted to the shipper who created the job")]
    NotOwner(&'static str),

    #[error("{0} is restricted to the driver assigned to the job")]
    NotAssignedDriver(&'static str),

    #[error("job is not visible to this actor")]
    NotVisible,
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        DomainError::Authorization(value.to_string())
    }
}

pub fn can_create(role: Role) -> bool {
    role == Role::Shipper
}

pub fn can_accept(role: Role) -> bool {
    role == Role::Driver
}

/// Any driver may decline an unassigned job; once assigned, only that driver.
pub fn can_reject(role: Role, actor: ActorId, parties: &JobParties) -> bool {
    role == Role::Driver && parties.driver_id.is_none_or(|d| d == actor)
}

pub fn can_start(role: Role, actor: ActorId, parties: &JobParties) -> bool {
    role == Role::Driver && parties.is_assigned_driver(actor)
}

pub fn can_complete(role: Role, actor: ActorId, parties: &JobParties) -> bool {
    role == Role::Driver && parties.is_assigned_driver(actor)
}

pub fn can_cancel(role: Role, actor: ActorId, parties: &JobParties) -> bool {
    role == Role::Shipper && parties.is_shipper(actor)
}

pub fn can_rate(role: Role, actor: ActorId, parties: &JobParties) -> bool {
    role == Role::Shipper && parties.is_shipper(actor)
}

/// Owning shipper, assigned driver, or any driver while the job is open.
pub fn can_view(role: Role, actor: ActorId, parties: &JobParties) -> bool {
    match role {
        Role::Shipper => parties.is_shipper(actor),
        Role::Driver => parties.is_assigned_driver(actor) || parties.open,
    }
}

/// Only the two parties of an assigned job follow its position.
pub fn can_view_location(role: Role, actor: ActorId, parties: &JobParties) -> bool {
    match role {
        Role::Shipper => parties.is_shipper(actor),
        Role::Driver => parties.is_assigned_driver(actor),
    }
}

/// Authorize a principal for an operation.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, operation: Operation<'_>) -> Result<(), AuthzError> {
    let role = principal.role();
    let actor = principal.actor_id();
    let name = operation.name();

    let role_required = |required: Role| AuthzError::RoleRequired {
        operation: name,
        required,
    };

    match operation {
        Operation::CreateJob => can_create(role).then_some(()).ok_or(role_required(Role::Shipper)),
        Operation::AcceptJob => can_accept(role).then_some(()).ok_or(role_required(Role::Driver)),
        Operation::RejectJob(p) => {
            if role != Role::Driver {
                Err(role_required(Role::Driver))
            } else if !can_reject(role, actor, p) {
                Err(AuthzError::NotAssignedDriver(name))
            } else {
                Ok(())
            }
        }
        Operation::StartJob(p) | Operation::CompleteJob(p) | Operation::ReportLocation(p) => {
            if role != Role::Driver {
                Err(role_required(Role::Driver))
            } else if !can_start(role, actor, p) {
                Err(AuthzError::NotAssignedDriver(name))
            } else {
                Ok(())
            }
        }
        Operation::CancelJob(p) | Operation::RateJob(p) => {
            if can_cancel(role, actor, p) {
                Ok(())
            } else {
                Err(AuthzError::NotOwner(name))
            }
        }
        Operation::ViewJob(p) => can_view(role, actor, p).then_some(()).ok_or(AuthzError::NotVisible),
        Operation::ViewLocation(p) => can_view_location(role, actor, p)
            .then_some(())
            .ok_or(AuthzError::NotVisible),
        Operation::ListJobs | Operation::InitiateContact | Operation::ListEngagements => Ok(()),
    }
}
