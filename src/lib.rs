pub mod config;
pub mod models;
pub mod knowledge; // Standard clause library per (contract type, jurisdiction)
pub mod pipeline; // Extraction, analysis, validation, comparison stages
pub mod job; // Job lifecycle, status store, orchestrator

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries embedding the pipeline.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
