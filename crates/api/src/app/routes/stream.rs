use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse};

use crate::app::services::{self, AppServices};
use crate::context::PrincipalContext;

/// GET /stream
///
/// Push-only SSE channel. The caller is reachable for notifications for as
/// long as this response stays open.
pub async fn stream(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> impl IntoResponse {
    services::actor_sse_stream(services, *principal.principal())
}
