//! Persistence layer.
//!
//! Job records live in memory and are pruned; the durable record of finished
//! work is the report table managed here.

/// Durable research report records over libsql.
pub mod reports;

pub use reports::ReportStore;
