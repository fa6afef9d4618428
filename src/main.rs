use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use rubriq::api::server::start_api_server;
use rubriq::config::{self, Config};
use rubriq::grading::{Grader, OllamaClient, RetryPolicy};
use rubriq::session::SessionStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Rubriq starting v{}", config::APP_VERSION);

    let cfg = Config::from_env();
    tracing::info!(
        backend = %cfg.ollama_url,
        model = %cfg.model,
        timeout_secs = cfg.timeout_secs,
        "Configuration loaded"
    );

    let client = Arc::new(OllamaClient::new(&cfg.ollama_url, cfg.timeout_secs));
    let grader = Arc::new(Grader::new(
        client,
        cfg.model.clone(),
        RetryPolicy::new(cfg.max_attempts),
    ));
    let sessions = Arc::new(SessionStore::new());

    let mut server = match start_api_server(&cfg, grader, sessions).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start API server: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }

    tracing::info!("Shutting down");
    server.shutdown();
}
