use std::sync::Arc;

use anyhow::Context;
use axum::{Router, middleware, routing::get};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tp_api::{config::ApiConfig, state::ApiState};
use tp_db::PgStore;
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("Invalid configuration")?;

    tp_api::tracing::init_tracing(config.env);

    let metrics_handle = tp_api::metrics::init_metrics()?;

    // Fail fast when the database is unreachable
    tp_db::ensure_database(&config.database_url).await?;
    let pool = tp_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to the database")?;
    tp_db::run_migrations(&pool).await?;
    tracing::info!("Database connected and migrated");

    let state = ApiState::new(Arc::new(PgStore::new(pool.clone())));

    let cors = tp_api::middleware::cors::create_cors_layer(config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Metrics endpoint has its own state
    let metrics_app = Router::new()
        .route("/metrics", get(tp_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = tp_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(tp_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            tp_api::middleware::request_id::request_id_middleware,
        ));

    let app = tp_api::middleware::security_headers::apply_security_headers(app, config.env);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!(%address, environment = ?config.env, "TinyPal API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped, database pool closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received, shutting down gracefully"),
        () = terminate => tracing::info!("SIGTERM received, shutting down gracefully"),
    }
}
