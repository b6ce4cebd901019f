use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth};
use service::mailer::TracingMailer;
use service::Notifier;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Assemble router state from configuration and an open connection.
pub fn build_state(cfg: &AppConfig, db: DatabaseConnection) -> auth::ServerState {
    let mailer = Arc::new(TracingMailer::from_settings(&cfg.smtp));
    auth::ServerState {
        db,
        auth: auth::ServerAuthConfig::from_settings(&cfg.auth),
        notifier: Notifier::new(mailer, cfg.smtp.clone()),
    }
}

/// Public entry: load config, migrate, build the app and run the HTTP server
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    common::env::ensure_env(&cfg.smtp.logo_path, "data").await?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await.map_err(anyhow::Error::from)?;
    info!("migrations applied");

    let state = build_state(&cfg, db);
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting prestar server");
    let listener = TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    serve(listener, app, shutdown_signal()).await
}

/// Serve until `shutdown` resolves, then let in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(anyhow::Error::from)?;
    info!("server drained");
    Ok(())
}

/// Resolves on Ctrl+C; in-flight requests finish before `run` returns.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c handler unavailable; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
