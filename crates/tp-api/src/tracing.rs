//! Tracing and logging configuration.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

const DEVELOPMENT_FILTER: &str = "tp_api=debug,tp_core=debug,tp_db=debug,serv=debug,tower_http=debug,sqlx=warn,info";
const PRODUCTION_FILTER: &str = "info,tower_http=info,sqlx=warn";

/// Initialize tracing/logging based on the environment
///
/// Development logs are pretty-printed with file locations, production logs
/// are flattened JSON for log aggregation. `RUST_LOG` overrides the default
/// filter in both (e.g. `RUST_LOG=debug,tower_http=trace`).
pub fn init_tracing(env: Environment) {
    let default_filter = if env.is_development() {
        DEVELOPMENT_FILTER
    } else {
        PRODUCTION_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry();
    if env.is_development() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .pretty()
                    .with_filter(env_filter),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .flatten_event(true)
                    .with_target(true)
                    .with_filter(env_filter),
            )
            .init();
    }

    tracing::info!(environment = ?env, "Tracing initialized");
}
