use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;

use haulnet_core::{ActorId, DomainError, EngagementId};
use haulnet_jobs::Engagement;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngagementStoreError {
    #[error("engagement {0} already recorded")]
    Duplicate(EngagementId),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<EngagementStoreError> for DomainError {
    fn from(value: EngagementStoreError) -> Self {
        DomainError::infrastructure(value.to_string())
    }
}

/// Append-only engagement records, keyed by id.
pub trait EngagementStore: Send + Sync {
    fn append(&self, engagement: Engagement) -> Result<(), EngagementStoreError>;

    /// Every record where the actor is either party.
    fn involving(&self, actor_id: ActorId) -> Result<Vec<Engagement>, EngagementStoreError>;
}

impl<S> EngagementStore for Arc<S>
where
    S: EngagementStore + ?Sized,
{
    fn append(&self, engagement: Engagement) -> Result<(), EngagementStoreError> {
        (**self).append(engagement)
    }

    fn involving(&self, actor_id: ActorId) -> Result<Vec<Engagement>, EngagementStoreError> {
        (**self).involving(actor_id)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryEngagementStore {
    records: DashMap<EngagementId, Engagement>,
}

impl InMemoryEngagementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EngagementStore for InMemoryEngagementStore {
    fn append(&self, engagement: Engagement) -> Result<(), EngagementStoreError> {
        let id = engagement.id;

        match self.records.entry(id) {
            Entry::Occupied(_) => Err(EngagementStoreError::Duplicate(id)),
            Entry::Vacant(e) => {
                e.insert(engagement);
                Ok(())
            }
        }
    }

    fn involving(&self, actor_id: ActorId) -> Result<Vec<Engagement>, EngagementStoreError> {
        Ok(self
            .records
            .iter()
            .filter(|e| e.value().involves(actor_id))
            .map(|e| e.value().clone())
            .collect())
    }
}
