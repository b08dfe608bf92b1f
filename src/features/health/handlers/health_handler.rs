use axum::{extract::State, Json};
use sqlx::PgPool;

use crate::core::database;
use crate::core::error::Result;
use crate::features::health::dtos::HealthDto;
use crate::shared::types::ApiResponse;

/// Report liveness; fails with 500 when Postgres cannot be reached
pub async fn health_check(State(pool): State<PgPool>) -> Result<Json<ApiResponse<HealthDto>>> {
    database::ping(&pool).await?;
    Ok(Json(ApiResponse::success(Some(HealthDto::up()), None)))
}
