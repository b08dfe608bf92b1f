use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a tracked document
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct File {
    pub id: Uuid,
    pub file_name: String,
    pub client_id: Option<Uuid>,
    /// Inline contact address, used when no client is linked
    pub email: Option<String>,
    pub master_id: Uuid,
    pub publish_date: DateTime<Utc>,
    pub expired_date: DateTime<Utc>,
    pub reminder_subject: String,
    /// HTML body of the reminder email
    pub reminder_body: String,
    /// Path of the stored blob
    pub file_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
