//! patient-server library crate
//!
//! Exposes `build_app`, the persistence gateway, the patient service and the
//! outbound client. The binary entrypoint is in `main.rs`.

pub mod client;
pub mod config;
pub mod db;
mod error;
mod middleware;
mod routes;
pub mod service;

use std::sync::OnceLock;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::PatientStore;
use service::PatientService;

pub use routes::BASE_PATH;

/// Build the full application router with all routes and middleware.
///
/// Generic over the store so integration tests can run the same router
/// against an in-memory store without binding to a TCP port.
pub fn build_app<S: PatientStore>(service: PatientService<S>, config: &Config) -> Router {
    let prometheus_handle = prometheus_handle();

    let operational_routes: Router<PatientService<S>> = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::patient_routes::<S>())
        .merge(operational_routes)
        .with_state(service)
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}

/// Handle of the process-wide Prometheus recorder.
///
/// The recorder is installed on first use and every later app built in the
/// same process shares it. If some other global recorder was installed
/// first, the handle renders an empty exposition.
fn prometheus_handle() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            let _ = metrics::set_global_recorder(recorder);
            handle
        })
        .clone()
}
