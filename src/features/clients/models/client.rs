use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a registered business client
#[derive(Debug, Clone, FromRow)]
#[allow(dead_code)]
pub struct Client {
    pub id: Uuid,
    pub client_name: String,
    pub first_email: String,
    pub second_email: Option<String>,
    pub first_phone: String,
    pub second_phone: Option<String>,
    pub address: String,
    pub business_type: String,
    /// Active flag; inactive clients are kept for history
    pub status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
