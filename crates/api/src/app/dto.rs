use core::str::FromStr;

use axum::{
    Json,
    extract::{FromRequest, Request},
    response::Response,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use haulnet_auth::{Principal, Role};
use haulnet_core::{ActorId, DomainError, DomainResult, JobId};
use haulnet_jobs::{Address, CargoType, GeoPoint, JobDetails, JobFilter};

use crate::app::errors;

// -------------------------
// Request bodies
// -------------------------

/// A JSON object body, decoded field by field so a bad value is reported
/// against the field that carried it.
///
/// Anything that is not a JSON object is rejected as a validation error on
/// `body`.
#[derive(Debug, Default)]
pub struct JsonBody(Map<String, Value>);

#[axum::async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Map<String, Value>>::from_request(req, state).await {
            Ok(Json(fields)) => Ok(JsonBody(fields)),
            Err(rejection) => Err(errors::domain_error_to_response(DomainError::validation(
                "body",
                rejection.body_text(),
            ))),
        }
    }
}

impl JsonBody {
    pub fn optional<T: DeserializeOwned>(&self, field: &'static str) -> DomainResult<Option<T>> {
        match self.0.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => T::deserialize(raw)
                .map(Some)
                .map_err(|e| DomainError::validation(field, format!("invalid value: {e}"))),
        }
    }

    pub fn required<T: DeserializeOwned>(&self, field: &'static str) -> DomainResult<T> {
        self.optional(field)?
            .ok_or_else(|| DomainError::validation(field, "is required"))
    }
}

#[cfg(test)]
impl From<Value> for JsonBody {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => JsonBody(fields),
            _ => JsonBody::default(),
        }
    }
}

/// Job details; shape checks here, business checks in the domain.
pub fn job_details(body: &JsonBody) -> DomainResult<JobDetails> {
    Ok(JobDetails {
        origin: body.optional::<Address>("origin")?.unwrap_or_default(),
        destination: body.optional::<Address>("destination")?.unwrap_or_default(),
        cargo_type: body.optional::<CargoType>("cargoType")?,
        estimated_weight: body.optional("estimatedWeight")?,
        price: body.optional("price")?,
        scheduled_at: body.optional("scheduledAt")?,
    })
}

pub fn rating_score(body: &JsonBody) -> DomainResult<i32> {
    body.required("score")
}

pub fn geo_point(body: &JsonBody) -> DomainResult<GeoPoint> {
    Ok(GeoPoint {
        latitude: body.optional("latitude")?,
        longitude: body.optional("longitude")?,
    })
}

#[derive(Debug)]
pub struct InitiateContactRequest {
    pub counterparty_id: ActorId,
    pub job_id: JobId,
    /// Optional self-declared role; must agree with the token when present.
    pub initiator_role: Option<String>,
}

impl InitiateContactRequest {
    pub fn from_body(body: &JsonBody) -> DomainResult<Self> {
        Ok(Self {
            counterparty_id: parse_actor_id("counterpartyId", &body.required::<String>("counterpartyId")?)?,
            job_id: parse_job_id("jobId", &body.required::<String>("jobId")?)?,
            initiator_role: body.optional("initiatorRole")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListJobsQuery {
    pub filter: Option<String>,
}

// -------------------------
// Parsing helpers
// -------------------------

pub fn parse_job_id(field: &'static str, raw: &str) -> DomainResult<JobId> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::validation(field, "invalid identifier"))
}

pub fn parse_actor_id(field: &'static str, raw: &str) -> DomainResult<ActorId> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::validation(field, "invalid identifier"))
}

pub fn parse_filter(query: &ListJobsQuery) -> DomainResult<Option<JobFilter>> {
    query
        .filter
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .map(JobFilter::from_str)
        .transpose()
}

/// Check a declared initiator role against the authenticated one.
pub fn check_declared_role(principal: &Principal, declared: Option<&str>) -> DomainResult<()> {
    let Some(raw) = declared else {
        return Ok(());
    };
    let role = Role::from_str(raw)?;
    if role != principal.role() {
        return Err(DomainError::authorization(format!(
            "declared role `{role}` does not match the authenticated role `{}`",
            principal.role()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulnet_core::ErrorKind;
    use serde_json::json;

    fn field_of(err: DomainError) -> Option<String> {
        err.field().map(str::to_string)
    }

    #[test]
    fn empty_filter_means_none() {
        let q = ListJobsQuery { filter: Some("  ".into()) };
        assert_eq!(parse_filter(&q).unwrap(), None);
        let q = ListJobsQuery { filter: Some("history".into()) };
        assert_eq!(parse_filter(&q).unwrap(), Some(JobFilter::History));
        let q = ListJobsQuery { filter: Some("all".into()) };
        assert_eq!(parse_filter(&q).unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn declared_role_must_be_known_and_match() {
        let driver = Principal::driver(ActorId::new());
        assert!(check_declared_role(&driver, None).is_ok());
        assert!(check_declared_role(&driver, Some("motorista")).is_ok());
        assert_eq!(
            check_declared_role(&driver, Some("admin")).unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            check_declared_role(&driver, Some("cliente")).unwrap_err().kind(),
            ErrorKind::Authorization
        );
    }

    #[test]
    fn bad_ids_report_the_wire_field() {
        assert_eq!(parse_job_id("jobId", "nope").unwrap_err().field(), Some("jobId"));
        assert_eq!(
            parse_actor_id("counterpartyId", "nope").unwrap_err().field(),
            Some("counterpartyId")
        );

        let body = JsonBody::from(json!({ "counterpartyId": ActorId::new(), "jobId": "nope" }));
        let err = InitiateContactRequest::from_body(&body).unwrap_err();
        assert_eq!(field_of(err).as_deref(), Some("jobId"));
    }

    #[test]
    fn job_details_name_the_bad_field() {
        let body = JsonBody::from(json!({ "cargoType": "spaceship" }));
        assert_eq!(field_of(job_details(&body).unwrap_err()).as_deref(), Some("cargoType"));

        let body = JsonBody::from(json!({ "price": "cheap" }));
        assert_eq!(field_of(job_details(&body).unwrap_err()).as_deref(), Some("price"));

        let body = JsonBody::from(json!({ "cargoType": "mudanca", "price": null }));
        let details = job_details(&body).unwrap();
        assert_eq!(details.cargo_type, Some(CargoType::Relocation));
        assert_eq!(details.price, None);
    }

    #[test]
    fn score_must_be_a_present_integer() {
        assert_eq!(rating_score(&JsonBody::from(json!({ "score": 4 }))).unwrap(), 4);
        for body in [json!({ "score": 4.5 }), json!({ "score": "4" }), json!({})] {
            let err = rating_score(&JsonBody::from(body)).unwrap_err();
            assert_eq!(err.field(), Some("score"));
        }
    }
}
