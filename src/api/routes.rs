use crate::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(crate::api::handlers::health))
        .route(
            "/api/research",
            post(crate::api::handlers::research::start_research),
        )
        .route(
            "/api/research/{job_id}",
            get(crate::api::handlers::research::research_status),
        )
        .route(
            "/api/research/{job_id}/cancel",
            post(crate::api::handlers::research::cancel_research),
        )
        .route(
            "/api/reports",
            get(crate::api::handlers::reports::list_reports),
        )
}
