use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::notifications::ports::AuditReporter;
use crate::features::reports::models::Report;

/// Service for the append-only audit log
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one audit entry
    pub async fn create(&self, description: &str) -> Result<Report> {
        let report = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (description)
            VALUES ($1)
            RETURNING id, description, created_at
            "#,
        )
        .bind(description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create audit report: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::debug!(
            "Audit report {} created at {}: {}",
            report.id,
            report.created_at,
            report.description
        );
        Ok(report)
    }
}

#[async_trait]
impl AuditReporter for ReportService {
    async fn record(&self, description: &str) -> Result<()> {
        self.create(description).await.map(|_| ())
    }
}
