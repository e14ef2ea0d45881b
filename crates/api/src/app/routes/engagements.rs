use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new().route("/", post(initiate_contact).get(list_engagements))
}

/// POST /engagements
///
/// Records the contact and returns the handoff summary for the chat client.
pub async fn initiate_contact(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: dto::JsonBody,
) -> Response {
    let principal = principal.principal();
    let result = dto::InitiateContactRequest::from_body(&body).and_then(|request| {
        dto::check_declared_role(principal, request.initiator_role.as_deref())?;
        services
            .engagements
            .initiate_contact(principal, request.counterparty_id, request.job_id)
    });

    match result {
        Ok(handoff) => (StatusCode::CREATED, Json(handoff)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_engagements(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    match services.engagements.list_engagements(principal.principal()) {
        Ok(items) => (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
