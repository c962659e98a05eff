//! Prometheus metrics for monitoring API performance and content usage.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .unwrap()
});
static NUMBER_SEGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/\d+").unwrap());
static PROGRESS_USER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/api/progress/[^/]+$").unwrap());

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full("http_request_duration_seconds".to_string()),
        &[
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ],
    )?;

    Ok(builder.install_recorder()?)
}

/// Middleware to record HTTP request metrics
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone())
        .increment(1.0);

    let response = next.run(req).await;

    gauge!("http_requests_in_flight", "method" => method.clone(), "path" => path.clone())
        .decrement(1.0);

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Normalize URL paths to reduce cardinality in metrics
///
/// UUIDs, numeric ids and free-form user ids become `:id` / `:user_id`.
pub fn normalize_path(path: &str) -> String {
    if PROGRESS_USER.is_match(path) && !path.ends_with("/facts") && !path.ends_with("/flashcards")
    {
        return "/api/progress/:user_id".to_string();
    }

    let normalized = UUID_SEGMENT.replace_all(path, ":id");
    NUMBER_SEGMENT
        .replace_all(&normalized, "/:id")
        .into_owned()
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

/// Record a progress tracking call
pub fn record_progress_event(content: &'static str, completed: bool) {
    counter!(
        "progress_events_total",
        "content" => content,
        "completed" => completed.to_string()
    )
    .increment(1);
}

/// Record a random sampling outcome
pub fn record_sample(content: &'static str, hit: bool) {
    let outcome = if hit { "hit" } else { "miss" };

    counter!(
        "random_samples_total",
        "content" => content,
        "outcome" => outcome
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/api/facts/550e8400-e29b-41d4-a716-446655440000"),
            "/api/facts/:id"
        );
        assert_eq!(
            normalize_path("/api/categories/550e8400-e29b-41d4-a716-446655440000/stats"),
            "/api/categories/:id/stats"
        );
        assert_eq!(normalize_path("/api/facts/123/like"), "/api/facts/:id/like");
        assert_eq!(normalize_path("/api/progress/kid-42"), "/api/progress/:user_id");
        assert_eq!(normalize_path("/api/progress/facts"), "/api/progress/facts");
        assert_eq!(normalize_path("/api/flashcards/random"), "/api/flashcards/random");
        assert_eq!(normalize_path("/health"), "/health");
    }
}
