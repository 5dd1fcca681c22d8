// Main entry point for the extract API server

use std::sync::Arc;

use anyhow::{Context, Result};
use geoprocessing::{GpOptions, GpService};
use server_core::common::utils::SmtpClient;
use server_core::domains::auth::JwtService;
use server_core::domains::extracts::models::{PgExtractJobStore, PgHistoryStore};
use server_core::kernel::{start_scheduler, GeoprocessingAdapter, ServerDeps, SmtpNotifier};
use server_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,geoprocessing=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NMWRAP extract API");

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    let gp_options = GpOptions::new(config.gp_service_url.clone())
        .with_result_param(config.gp_result_param.clone())
        .with_timeout(config.gp_request_timeout);
    let gp_service = GpService::new(gp_options).context("Failed to create geoprocessing client")?;

    let smtp = SmtpClient::new(&config.smtp_relay, &config.mail_from)
        .context("Failed to create SMTP client")?;

    let deps = ServerDeps::new(
        Arc::new(PgExtractJobStore::new(pool.clone())),
        Arc::new(PgHistoryStore::new(pool.clone())),
        Arc::new(GeoprocessingAdapter::new(Arc::new(gp_service))),
        Arc::new(SmtpNotifier::new(smtp)),
        config.admin_email.clone(),
    );

    if deps.admin_email.is_none() {
        tracing::warn!("ADMIN_EMAIL not set, internal-error alerts are disabled");
    }

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = start_scheduler(deps.clone(), config.sweep_policy.clone(), config.sweep_interval)
        .await
        .context("Failed to start scheduler")?;

    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
    let app = build_app(pool, deps, jwt_service);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
