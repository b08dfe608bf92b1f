use axum::{routing::get, Router};
use sqlx::PgPool;

use crate::features::health::handlers;

/// Create routes for the health probe
pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(pool)
}
