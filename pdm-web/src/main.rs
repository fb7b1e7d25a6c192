//! pdm-web - predictive maintenance front end
//!
//! Loads the maintenance and failure-type models once, then serves the
//! single-record form, the dashboard and batch CSV processing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pdm_common::config::{ConfigOverrides, ConfigSource, ServerConfig};
use pdm_common::Predictor;
use pdm_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for pdm-web
#[derive(Parser, Debug)]
#[command(name = "pdm-web")]
#[command(about = "Predictive maintenance web front end")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "PDM_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PDM_PORT")]
    port: Option<u16>,

    /// Directory for uploaded and generated CSV files
    #[arg(long, env = "PDM_UPLOAD_DIR")]
    upload_dir: Option<PathBuf>,

    /// Column dropped from batch uploads before prediction ("" keeps all)
    #[arg(long, env = "PDM_IDENTIFIER_COLUMN")]
    identifier_column: Option<String>,

    /// Redirect single predictions to the dashboard
    #[arg(long, env = "PDM_DASHBOARD")]
    dashboard: Option<bool>,

    /// Maintenance model (ONNX graph; manifest alongside)
    #[arg(long, env = "PDM_MAINTENANCE_MODEL")]
    maintenance_model: Option<PathBuf>,

    /// Failure-type model (ONNX graph; manifest alongside)
    #[arg(long, env = "PDM_FAILURE_TYPE_MODEL")]
    failure_type_model: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset
    #[arg(long, env = "PDM_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            upload_dir: self.upload_dir.clone(),
            identifier_column: self.identifier_column.clone(),
            dashboard: self.dashboard,
            maintenance_model: self.maintenance_model.clone(),
            failure_type_model: self.failure_type_model.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let (config, source) = ServerConfig::load(args.config.as_deref(), args.overrides())
        .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting pdm-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &source {
        ConfigSource::File(_) => info!("Configuration: {}", source),
        ConfigSource::Defaults(_) => warn!("Configuration: {}", source),
    }

    let maintenance: Arc<dyn Predictor> = Arc::new(
        pdm_common::model::load_from_path(&config.maintenance_model)
            .context("Failed to load maintenance model")?,
    );
    let failure_type: Arc<dyn Predictor> = Arc::new(
        pdm_common::model::load_from_path(&config.failure_type_model)
            .context("Failed to load failure-type model")?,
    );
    info!("Maintenance model: {}", maintenance.summary());
    info!("Failure-type model: {}", failure_type.summary());

    let addr = config.bind_address();
    let state = AppState::new(config, maintenance, failure_type);
    state
        .uploads
        .ensure_exists()
        .context("Failed to create upload directory")?;
    info!("Upload directory: {}", state.uploads.dir().display());

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("pdm-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
