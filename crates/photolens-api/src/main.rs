//! photolens-api - HTTP API server for photolens

use std::net::SocketAddr;
use std::sync::Arc;

use photolens_api::services::{AssetStore, CloudinaryStore};
use photolens_api::{router, AppState};
use photolens_core::ServiceConfig;
use photolens_inference::{GeminiBackend, GenerationBackend};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "photolens_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "photolens_api=debug,photolens_core=debug,photolens_inference=debug,tower_http=debug"
            .into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("photolens-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ServiceConfig::from_env()?;

    let backend: Arc<dyn GenerationBackend> = Arc::new(GeminiBackend::from_env()?);
    let asset_store: Option<Arc<dyn AssetStore>> = match config.cloudinary.clone() {
        Some(cloudinary) => Some(Arc::new(CloudinaryStore::new(cloudinary)?)),
        None => {
            info!(
                subsystem = "api",
                component = "startup",
                "Upload relay not configured; /api/upload will answer internal_error"
            );
            None
        }
    };

    let state = AppState {
        backend,
        asset_store,
        access: config.access.clone(),
        validation_mode: config.validation_mode,
    };
    let app = router(state, config.max_body_bytes);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
