use algorithms_server::{AppState, config::Config, cors_layer, create_router};
use axum::http::HeaderValue;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration from the environment (and .env)
    let config = Config::from_env()?;

    // 2. Logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    config.print_info();

    // 3. Database pool and schema
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            error!("Failed to connect to the database: {}", e);
            e
        })?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database ready");

    // 4. Shared state with the completion client
    let state = Arc::new(AppState::with_groq(
        pool,
        config.jwt_secret.clone(),
        &config.llm,
    )?);

    // 5. Router with the CORS policy
    let allowed_origin = config
        .cors_allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()?;
    if allowed_origin.is_none() && config.is_production() {
        tracing::warn!("CORS_ALLOWED_ORIGIN not set in production, allowing any origin");
    }
    let app = create_router(state).layer(cors_layer(allowed_origin));

    // 6. Serve until Ctrl+C or SIGTERM
    let address = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
