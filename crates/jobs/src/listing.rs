//! Listing filters.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use haulnet_auth::{Principal, Role};
use haulnet_core::{ActorId, DomainError, DomainResult};

use crate::{Job, JobStatus};

/// Driver-facing listing filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobFilter {
    #[serde(alias = "disponiveis")]
    Available,
    #[serde(alias = "historico")]
    History,
}

impl FromStr for JobFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "available" | "disponiveis" => Ok(JobFilter::Available),
            "history" | "historico" => Ok(JobFilter::History),
            other => Err(DomainError::validation(
                "filter",
                format!("unknown filter `{other}` (expected `available` or `history`)"),
            )),
        }
    }
}

/// A resolved listing query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JobQuery {
    /// Open, unassigned jobs the driver has not declined.
    AvailableTo(ActorId),
    /// Jobs the driver holds or has finished.
    HistoryOf(ActorId),
    /// Everything a shipper has posted.
    CreatedBy(ActorId),
}

impl JobQuery {
    /// Shippers always list their own jobs; drivers must pick a filter.
    pub fn for_principal(principal: &Principal, filter: Option<JobFilter>) -> DomainResult<Self> {
        let actor = principal.actor_id();
        match (principal.role(), filter) {
            (Role::Shipper, _) => Ok(JobQuery::CreatedBy(actor)),
            (Role::Driver, Some(JobFilter::Available)) => Ok(JobQuery::AvailableTo(actor)),
            (Role::Driver, Some(JobFilter::History)) => Ok(JobQuery::HistoryOf(actor)),
            (Role::Driver, None) => Err(DomainError::validation(
                "filter",
                "drivers must list with `available` or `history`",
            )),
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        match *self {
            JobQuery::AvailableTo(driver) => {
                job.status() == JobStatus::Open && job.driver_id().is_none() && !job.has_rejected(driver)
            }
            JobQuery::HistoryOf(driver) => {
                job.driver_id() == Some(driver)
                    && matches!(
                        job.status(),
                        JobStatus::Accepted | JobStatus::InProgress | JobStatus::Completed
                    )
            }
            JobQuery::CreatedBy(shipper) => job.shipper_id() == shipper,
        }
    }
}
