mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::{database, middleware};
use crate::features::files::FileService;
use crate::features::health::routes as health_routes;
use crate::features::notifications::workers::ExpiryNotifierSettings;
use crate::features::notifications::ExpiryNotifier;
use crate::features::reports::ReportService;
use crate::modules::mail::SmtpMailer;
use axum::Router;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Starting berkas-reminder: mode={:?}, tokio_worker_threads={}, pid={}",
        config.notification.mode,
        worker_threads,
        std::process::id()
    );
    tracing::debug!("Mail configuration: {:?}", config.mail);

    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    let file_service = Arc::new(FileService::new(pool.clone()));
    let report_service = Arc::new(ReportService::new(pool.clone()));
    let mailer = Arc::new(
        SmtpMailer::new(&config.mail)
            .map_err(|e| anyhow::anyhow!("Failed to initialize SMTP transport: {}", e))?,
    );

    if let Some(ref redirect) = config.notification.recipient_override {
        tracing::warn!("All reminder emails are redirected to {}", redirect);
    }

    let expiry_notifier = ExpiryNotifier::new(
        file_service,
        mailer,
        report_service,
        ExpiryNotifierSettings::from_config(&config.notification, &config.mail),
    );
    tokio::spawn(async move {
        expiry_notifier.run().await;
    });
    tracing::info!("Expiry notifier worker spawned");

    let app = Router::new()
        .merge(health_routes::routes(pool))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
