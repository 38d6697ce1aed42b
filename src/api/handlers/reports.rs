//! Persisted report handlers.

use crate::{
    AppState,
    types::{ResearchReport, Result},
};
use axum::{Json, extract::State};

/// List all persisted research reports, newest first.
#[utoipa::path(
    get,
    path = "/api/reports",
    responses(
        (status = 200, description = "Saved reports", body = [ResearchReport])
    ),
    tag = "reports"
)]
pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<ResearchReport>>> {
    let reports = state.reports.list_reports().await?;
    Ok(Json(reports))
}
