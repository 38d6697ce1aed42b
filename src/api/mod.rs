//! HTTP API layer, built on Axum.
//!
//! # API Endpoints
//!
//! ## Research (`/api/research`)
//! - `POST /api/research` - Submit a research job, returns the job id
//! - `GET /api/research/{job_id}` - Poll job state and progress
//! - `POST /api/research/{job_id}/cancel` - Request cooperative cancellation
//!
//! ## Reports (`/api/reports`)
//! - `GET /api/reports` - List persisted research reports
//!
//! ## Health (`/api/health`)
//! - `GET /api/health` - Liveness check

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
