//! Research report persistence over libsql.
//!
//! One row per completed job. The UNIQUE constraint on `job_id` makes report
//! saving idempotent regardless of how many pollers observe the same
//! completion.

use crate::types::{AppError, Result, ResearchReport};
use chrono::Utc;
use libsql::{Builder, Connection, Database};

pub struct ReportStore {
    _db: Database,
    // A single connection shared by clone keeps `:memory:` databases
    // coherent across operations.
    conn: Connection,
}

impl ReportStore {
    /// Open (or create) a local database file.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open local database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Connect to a remote Turso database.
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    /// In-memory database, for tests.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let store = Self { _db: db, conn };
        store.initialize_schema().await?;
        Ok(store)
    }

    fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS research_reports (
                id TEXT PRIMARY KEY,
                job_id TEXT UNIQUE NOT NULL,
                prompt TEXT NOT NULL,
                artifact_key TEXT NOT NULL,
                artifact_url TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to create research_reports table: {}", e))
        })?;

        Ok(())
    }

    /// Save a report for a completed job. Idempotent on `job_id`: returns
    /// `true` if a row was inserted, `false` if the job already had one.
    pub async fn save_report(
        &self,
        job_id: &str,
        prompt: &str,
        artifact_key: &str,
        artifact_url: &str,
    ) -> Result<bool> {
        let conn = self.connection()?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().timestamp();

        let inserted = conn
            .execute(
                "INSERT OR IGNORE INTO research_reports
                 (id, job_id, prompt, artifact_key, artifact_url, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                (id, job_id, prompt, artifact_key, artifact_url, now),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to save report: {}", e)))?;

        Ok(inserted > 0)
    }

    /// Fetch the report for a job, if one was saved.
    pub async fn get_by_job(&self, job_id: &str) -> Result<Option<ResearchReport>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, job_id, prompt, artifact_key, artifact_url, created_at
                 FROM research_reports WHERE job_id = ?",
                [job_id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query report: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(Self::report_from_row(&row)?))
        } else {
            Ok(None)
        }
    }

    /// List all saved reports, newest first.
    pub async fn list_reports(&self) -> Result<Vec<ResearchReport>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, job_id, prompt, artifact_key, artifact_url, created_at
                 FROM research_reports ORDER BY created_at DESC",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query reports: {}", e)))?;

        let mut reports = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            reports.push(Self::report_from_row(&row)?);
        }

        Ok(reports)
    }

    fn report_from_row(row: &libsql::Row) -> Result<ResearchReport> {
        Ok(ResearchReport {
            id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
            job_id: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
            prompt: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
            artifact_key: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            artifact_url: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
            created_at: row.get(5).map_err(|e| AppError::Database(e.to_string()))?,
        })
    }
}
