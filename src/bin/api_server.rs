// src/bin/api_server.rs

use gift_search::infra::{config, logging};
use gift_search::transport;
use gift_search::DatabaseService;

/// Builds the database handle from the environment, or returns `None` when no usable
/// `DATABASE_URL` is configured (data endpoints then answer 500).
///
/// Connections are opened on first use, so a database that is down at boot only fails
/// the requests made while it is down.
fn connect_database() -> Option<DatabaseService> {
    let Some(url) = config::database_url() else {
        tracing::warn!("DATABASE_URL is not set; starting without a database");
        return None;
    };
    let database_name = config::database_name();
    match DatabaseService::connect(
        &url,
        database_name.as_deref(),
        config::max_connections(),
        config::acquire_timeout(),
    ) {
        Ok(db) => {
            tracing::info!(backend = db.backend(), "database handle ready");
            Some(db)
        }
        Err(e) => {
            tracing::error!(error = %e, "invalid DATABASE_URL; starting without a database");
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_dotenv();
    logging::init_logging(&config::log_level());

    // --- Database Initialization ---
    let db_service = connect_database();
    let app_state = transport::http::AppState::new(db_service);

    // --- API Server Initialization ---
    let app = transport::http::create_router(app_state);
    let addr = format!("0.0.0.0:{}", config::port());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}
