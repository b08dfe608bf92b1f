use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Clone, FromRow)]
pub struct Report {
    pub id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
