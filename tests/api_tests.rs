//! HTTP API scenarios against the real router with mock adapters.

mod common;

use axum_test::TestServer;
use common::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use strata::AppState;

async fn test_server() -> (TestServer, AppState) {
    let (orchestrator, jobs, reports) = happy_orchestrator().await;
    let state = AppState {
        config: Arc::new(test_config()),
        jobs,
        reports,
        orchestrator,
    };

    let app = strata::api::routes::create_router().with_state(state.clone());
    (TestServer::new(app).unwrap(), state)
}

/// Poll the status endpoint until a terminal state.
async fn poll_until_terminal(server: &TestServer, job_id: &str) -> Value {
    for _ in 0..500 {
        let response = server.get(&format!("/api/research/{job_id}")).await;
        response.assert_status_ok();
        let body: Value = response.json();
        let state = body["state"].as_str().unwrap().to_string();
        if state != "pending" && state != "running" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not reach a terminal state in time");
}

#[tokio::test]
async fn test_health() {
    let (server, _) = test_server().await;
    let response = server.get("/api/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_submit_and_poll_to_completion() {
    let (server, _) = test_server().await;

    let response = server
        .post("/api/research")
        .json(&json!({ "prompt": "Explain quantum entanglement", "depth": 2 }))
        .await;
    assert_eq!(response.status_code().as_u16(), 201);

    let body: Value = response.json();
    let job_id = body["job_id"].as_str().unwrap().to_string();

    let done = poll_until_terminal(&server, &job_id).await;
    assert_eq!(done["state"], "completed");
    assert_eq!(done["progress"]["percent"], 100);
    assert!(done["artifact_url"].as_str().unwrap().contains(&job_id));
    assert!(done.get("error").is_none());
}

#[tokio::test]
async fn test_submit_rejects_bad_depth() {
    let (server, state) = test_server().await;

    for depth in [0, 6] {
        let response = server
            .post("/api/research")
            .json(&json!({ "prompt": "valid", "depth": depth }))
            .await;
        assert_eq!(response.status_code().as_u16(), 400);
        let body: Value = response.json();
        assert!(body["error"].as_str().unwrap().contains("depth"));
    }

    // Rejected before any record was created.
    assert!(state.jobs.is_empty());
}

#[tokio::test]
async fn test_submit_rejects_malformed_body() {
    let (server, state) = test_server().await;

    // Missing prompt field.
    let response = server.post("/api/research").json(&json!({})).await;
    assert_eq!(response.status_code().as_u16(), 400);
    let body: Value = response.json();
    assert!(body["error"].as_str().is_some());

    // Prompt of the wrong type.
    let response = server
        .post("/api/research")
        .json(&json!({ "prompt": 5 }))
        .await;
    assert_eq!(response.status_code().as_u16(), 400);

    assert!(state.jobs.is_empty());
}

#[tokio::test]
async fn test_submit_rejects_empty_prompt() {
    let (server, _) = test_server().await;

    let response = server
        .post("/api/research")
        .json(&json!({ "prompt": "" }))
        .await;
    assert_eq!(response.status_code().as_u16(), 400);
}

#[tokio::test]
async fn test_status_unknown_job_is_404() {
    let (server, _) = test_server().await;

    let response = server
        .get(&format!("/api/research/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(response.status_code().as_u16(), 404);
}

#[tokio::test]
async fn test_cancel_terminal_job_is_conflict() {
    let (server, _) = test_server().await;

    let response = server
        .post("/api/research")
        .json(&json!({ "prompt": "short job", "depth": 1 }))
        .await;
    let body: Value = response.json();
    let job_id = body["job_id"].as_str().unwrap().to_string();

    poll_until_terminal(&server, &job_id).await;

    let response = server
        .post(&format!("/api/research/{job_id}/cancel"))
        .await;
    assert_eq!(response.status_code().as_u16(), 409);
}

#[tokio::test]
async fn test_completed_jobs_appear_in_reports() {
    let (server, _) = test_server().await;

    let response = server
        .post("/api/research")
        .json(&json!({ "prompt": "report listing", "depth": 1 }))
        .await;
    let body: Value = response.json();
    let job_id = body["job_id"].as_str().unwrap().to_string();
    poll_until_terminal(&server, &job_id).await;

    let response = server.get("/api/reports").await;
    response.assert_status_ok();
    let reports: Value = response.json();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["job_id"], job_id);
    assert_eq!(reports[0]["prompt"], "report listing");
}
