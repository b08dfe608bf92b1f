use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
    pub database: String,
}

impl HealthDto {
    pub fn up() -> Self {
        Self {
            status: "ok".to_string(),
            database: "up".to_string(),
        }
    }
}
