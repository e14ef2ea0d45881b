//! Engagement log: who contacted whom about which job.

pub mod store;

pub use store::{EngagementStore, EngagementStoreError, InMemoryEngagementStore};

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use haulnet_auth::{Operation, Principal, authorize};
use haulnet_core::{ActorId, DomainError, DomainResult, EngagementId, JobId};
use haulnet_events::{EventBus, EventEnvelope};
use haulnet_jobs::{ContactHandoff, DomainEvent, Engagement, HandoffSummary, latest_per_job};

use crate::job_store::JobStore;

pub const ENGAGEMENT_AGGREGATE_TYPE: &str = "freight.engagement";

#[derive(Debug)]
pub struct EngagementLog<E, J, B> {
    engagements: E,
    jobs: J,
    bus: B,
}

impl<E, J, B> EngagementLog<E, J, B>
where
    E: EngagementStore,
    J: JobStore,
    B: EventBus<EventEnvelope<DomainEvent>>,
{
    pub fn new(engagements: E, jobs: J, bus: B) -> Self {
        Self { engagements, jobs, bus }
    }

    /// Record a contact and build the handoff for the chat collaborator.
    pub fn initiate_contact(
        &self,
        initiator: &Principal,
        counterparty_id: ActorId,
        job_id: JobId,
    ) -> DomainResult<ContactHandoff> {
        authorize(initiator, Operation::InitiateContact)?;

        let job = self
            .jobs
            .load(job_id)?
            .ok_or_else(|| DomainError::not_found(format!("job {job_id}")))?;

        let engagement = Engagement::record(EngagementId::new(), initiator, counterparty_id, job_id, Utc::now())?;
        self.engagements.append(engagement.clone())?;

        info!(
            engagement_id = %engagement.id,
            job_id = %job_id,
            actor_id = %initiator.actor_id(),
            counterparty_id = %counterparty_id,
            "contact initiated"
        );

        let handoff = ContactHandoff {
            summary: HandoffSummary::for_job(&job, counterparty_id),
            engagement,
        };
        self.publish(counterparty_id, &handoff);
        Ok(handoff)
    }

    /// The newest engagement per job for this actor, newest first.
    pub fn list_engagements(&self, principal: &Principal) -> DomainResult<Vec<Engagement>> {
        authorize(principal, Operation::ListEngagements)?;
        let records = self.engagements.involving(principal.actor_id())?;
        Ok(latest_per_job(records))
    }

    fn publish(&self, recipient: ActorId, handoff: &ContactHandoff) {
        let envelope = EventEnvelope::new(
            Uuid::now_v7(),
            *handoff.engagement.id.as_uuid(),
            ENGAGEMENT_AGGREGATE_TYPE,
            1,
            DomainEvent::ContactInitiated {
                recipient,
                handoff: handoff.clone(),
            },
        );

        if let Err(err) = self.bus.publish(envelope) {
            warn!(engagement_id = %handoff.engagement.id, error = ?err, "event publication failed");
        }
    }
}
