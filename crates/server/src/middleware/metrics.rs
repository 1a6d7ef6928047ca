//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::routes::BASE_PATH;

/// Collapse patient ids into `:id` so per-record requests share one label
fn normalize_path(path: &str) -> String {
    match path.strip_prefix(BASE_PATH).and_then(|rest| rest.strip_prefix('/')) {
        Some("health") | Some("") => path.to_string(),
        Some(_) => format!("{}/:id", BASE_PATH),
        None => path.to_string(),
    }
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}
