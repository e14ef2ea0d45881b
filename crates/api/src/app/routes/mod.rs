use axum::{Router, routing::get};

pub mod engagements;
pub mod jobs;
pub mod stream;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/stream", get(stream::stream))
        .nest("/jobs", jobs::router())
        .nest("/engagements", engagements::router())
}
