//! Contact records between shippers and drivers.
//!
//! Append-only: an engagement is written once and never changes. The chat
//! handoff itself happens elsewhere; this module only produces the record and
//! the summary text handed to it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use haulnet_auth::{Principal, Role};
use haulnet_core::{ActorId, DomainError, DomainResult, EngagementId, Entity, JobId};

use crate::{Address, CargoType, Job};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub id: EngagementId,
    pub shipper_id: ActorId,
    pub driver_id: ActorId,
    pub job_id: JobId,
    pub initiated_by: Role,
    pub created_at: DateTime<Utc>,
}

impl Entity for Engagement {
    type Id = EngagementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Engagement {
    /// The initiator's role decides which side of the pair they are on.
    pub fn record(
        id: EngagementId,
        initiator: &Principal,
        counterparty_id: ActorId,
        job_id: JobId,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if counterparty_id == initiator.actor_id() {
            return Err(DomainError::validation(
                "counterpartyId",
                "cannot initiate contact with yourself",
            ));
        }

        let (shipper_id, driver_id) = match initiator.role() {
            Role::Shipper => (initiator.actor_id(), counterparty_id),
            Role::Driver => (counterparty_id, initiator.actor_id()),
        };

        Ok(Self {
            id,
            shipper_id,
            driver_id,
            job_id,
            initiated_by: initiator.role(),
            created_at,
        })
    }

    pub fn involves(&self, actor_id: ActorId) -> bool {
        self.shipper_id == actor_id || self.driver_id == actor_id
    }

    /// The party who did not initiate.
    pub fn counterparty(&self) -> ActorId {
        match self.initiated_by {
            Role::Shipper => self.driver_id,
            Role::Driver => self.shipper_id,
        }
    }
}

/// Job summary handed to the chat collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffSummary {
    pub counterparty_id: ActorId,
    pub job_id: JobId,
    pub origin: Address,
    pub destination: Address,
    pub cargo_type: CargoType,
    pub price: Option<f64>,
    pub message: String,
}

impl HandoffSummary {
    pub fn for_job(job: &Job, counterparty_id: ActorId) -> Self {
        let price = match job.price() {
            Some(p) => format!("{p:.2}"),
            None => "to be agreed".to_string(),
        };
        let message = format!(
            "Hello! I'd like to talk about the freight job from {} to {}. Cargo: {}. Price: {}.",
            job.origin(),
            job.destination(),
            job.cargo_type().as_str(),
            price,
        );

        Self {
            counterparty_id,
            job_id: job.job_id(),
            origin: job.origin().clone(),
            destination: job.destination().clone(),
            cargo_type: job.cargo_type(),
            price: job.price(),
            message,
        }
    }
}

/// What `initiate_contact` hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactHandoff {
    pub engagement: Engagement,
    pub summary: HandoffSummary,
}

/// Keep only the newest engagement per job, newest first.
///
/// Ties on `created_at` fall back to the id so the result is deterministic.
pub fn latest_per_job<I>(engagements: I) -> Vec<Engagement>
where
    I: IntoIterator<Item = Engagement>,
{
    let mut latest: HashMap<JobId, Engagement> = HashMap::new();
    for e in engagements {
        match latest.get(&e.job_id) {
            Some(current) if (current.created_at, current.id) >= (e.created_at, e.id) => {}
            _ => {
                latest.insert(e.job_id, e);
            }
        }
    }

    let mut out: Vec<Engagement> = latest.into_values().collect();
    out.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
    out
}
