use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use haulnet_auth::Principal;
use haulnet_core::{DomainResult, JobId};
use haulnet_jobs::{Job, JobLocation};

use crate::app::services::{AppServices, Jobs};
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_job).get(list_jobs))
        .route("/:id", get(get_job))
        .route("/:id/accept", post(accept_job))
        .route("/:id/reject", post(reject_job))
        .route("/:id/start", post(start_job))
        .route("/:id/complete", post(complete_job))
        .route("/:id/cancel", post(cancel_job))
        .route("/:id/rate", post(rate_job))
        .route("/:id/location", post(update_location).get(get_location))
}

fn job_response(status: StatusCode, result: DomainResult<Job>) -> Response {
    match result {
        Ok(job) => (status, Json(job)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn transition(
    services: &AppServices,
    principal: &PrincipalContext,
    raw_id: &str,
    op: impl FnOnce(&Jobs, &Principal, JobId) -> DomainResult<Job>,
) -> Response {
    let result = dto::parse_job_id("id", raw_id).and_then(|id| op(&services.jobs, principal.principal(), id));
    job_response(StatusCode::OK, result)
}

pub async fn create_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: dto::JsonBody,
) -> Response {
    let result = dto::job_details(&body).and_then(|details| services.jobs.create_job(principal.principal(), details));
    job_response(StatusCode::CREATED, result)
}

pub async fn list_jobs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<dto::ListJobsQuery>,
) -> Response {
    let result = dto::parse_filter(&query).and_then(|filter| services.jobs.list_jobs(principal.principal(), filter));
    match result {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    transition(&services, &principal, &id, |jobs, p, id| jobs.get_job(p, id))
}

pub async fn accept_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    transition(&services, &principal, &id, |jobs, p, id| jobs.accept_job(p, id))
}

pub async fn reject_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    transition(&services, &principal, &id, |jobs, p, id| jobs.reject_job(p, id))
}

pub async fn start_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    transition(&services, &principal, &id, |jobs, p, id| jobs.start_job(p, id))
}

pub async fn complete_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    transition(&services, &principal, &id, |jobs, p, id| jobs.complete_job(p, id))
}

pub async fn cancel_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    transition(&services, &principal, &id, |jobs, p, id| jobs.cancel_job(p, id))
}

pub async fn rate_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: dto::JsonBody,
) -> Response {
    match dto::rating_score(&body) {
        Ok(score) => transition(&services, &principal, &id, |jobs, p, id| jobs.rate_job(p, id, score)),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn location_response(result: DomainResult<JobLocation>) -> Response {
    match result {
        Ok(location) => (StatusCode::OK, Json(location)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// POST /jobs/:id/location
pub async fn update_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: dto::JsonBody,
) -> Response {
    let result = dto::parse_job_id("id", &id).and_then(|job_id| {
        let point = dto::geo_point(&body)?;
        services.locations.update_location(principal.principal(), job_id, point)
    });
    location_response(result)
}

pub async fn get_location(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    let result = dto::parse_job_id("id", &id)
        .and_then(|job_id| services.locations.get_location(principal.principal(), job_id));
    location_response(result)
}
