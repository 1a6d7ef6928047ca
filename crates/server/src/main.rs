//! patient-server: Patient CRUD service binary entrypoint.

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use patient_server::config::{Config, StoreBackend};
use patient_server::db::{InMemoryPatientStore, PatientStore, PgPatientStore};
use patient_server::service::PatientService;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env();

    match config.store {
        StoreBackend::Postgres => {
            let pool = patient_server::db::create_pool(&config.database_url)
                .await
                .expect("Failed to create database pool");
            let store = PgPatientStore::new(pool);
            store
                .migrate()
                .await
                .expect("Failed to prepare patients table");
            tracing::info!("Using PostgreSQL patient store");
            serve(store, &config).await;
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory patient store, records are lost on shutdown");
            serve(InMemoryPatientStore::new(), &config).await;
        }
    }

    tracing::info!("Server shutdown complete");
}

async fn serve<S: PatientStore>(store: S, config: &Config) {
    let app = patient_server::build_app(PatientService::new(store), config);

    let addr: SocketAddr = config.bind_address.parse().expect("Invalid bind address");
    tracing::info!("Starting patient service on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
