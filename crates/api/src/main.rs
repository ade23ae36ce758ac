use std::net::SocketAddr;
use std::sync::Arc;

use dialplan_api::config::ServerConfig;
use dialplan_api::logging::init_tracing;
use dialplan_api::router::build_app_router;
use dialplan_api::state::AppState;
use dialplan_mi::{MiClient, MiExecutor};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // --- Tracing ---
    init_tracing(&config);
    tracing::info!(
        service = %config.app_name,
        env = %config.environment,
        host = %config.host,
        port = config.port,
        prefix = %config.api_prefix,
        "Loaded server configuration",
    );

    // --- Database ---
    let pool = dialplan_db::create_pool(config.database.options.clone(), config.database.pool_size)
        .await
        .expect("Failed to connect to database");
    tracing::info!(max_connections = config.database.pool_size, "Database connection pool created");

    dialplan_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    // --- MI client ---
    let mi = MiClient::new(&config.mi.host, config.mi.port, config.mi.timeout)
        .expect("Failed to build MI HTTP client");
    tracing::info!(url = mi.url(), "OpenSIPS MI client configured");
    let mi: Arc<dyn MiExecutor> = Arc::new(mi);

    // --- App state & router ---
    let config = Arc::new(config);
    let state = AppState::new(pool.clone(), Arc::clone(&config), mi);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, closing database pool");
    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
