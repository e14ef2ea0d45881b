use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

use haulnet_auth::JwtValidator;

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Resolve the bearer token to a principal or refuse with a reason code.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(|| unauthorized("token_missing"))?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        debug!(reason = e.reason_code(), error = %e, "credential rejected");
        unauthorized(e.reason_code())
    })?;

    req.extensions_mut()
        .insert(PrincipalContext::new(claims.principal(), claims.expires_at));

    Ok(next.run(req).await)
}

fn unauthorized(reason: &'static str) -> Response {
    errors::json_error(StatusCode::UNAUTHORIZED, reason, "authentication required")
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();

    if token.is_empty() { None } else { Some(token) }
}
