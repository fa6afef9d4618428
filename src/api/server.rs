//! HTTP server lifecycle — bind → spawn background task → return a handle
//! with a shutdown channel.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::api::router::grading_router;
use crate::api::types::ApiContext;
use crate::config::Config;
use crate::grading::Grader;
use crate::session::SessionStore;

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ApiServer {
    /// Shut down the server gracefully. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }
}

/// Start the API server on all interfaces at the configured port.
pub async fn start_api_server(
    config: &Config,
    grader: Arc<Grader>,
    sessions: Arc<SessionStore>,
) -> Result<ApiServer, String> {
    start_api_server_on(
        IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED),
        config.port,
        grader,
        sessions,
    )
    .await
}

/// Start the API server on a specific IP and port.
///
/// Factored out so tests can bind `127.0.0.1` on an ephemeral port.
pub async fn start_api_server_on(
    ip: IpAddr,
    port: u16,
    grader: Arc<Grader>,
    sessions: Arc<SessionStore>,
) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(SocketAddr::new(ip, port))
        .await
        .map_err(|e| format!("Failed to bind API server: {e}"))?;

    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    tracing::info!(%addr, "API server binding");

    let app = grading_router(ApiContext::new(grader, sessions));

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{MockLlmClient, RetryPolicy};

    fn test_grader() -> Arc<Grader> {
        Arc::new(Grader::new(
            Arc::new(MockLlmClient::new(r#"{"score": 6, "feedback": "ok"}"#)),
            "llama3.1:8b".to_string(),
            RetryPolicy::default(),
        ))
    }

    async fn start_test_server() -> ApiServer {
        start_api_server_on(
            IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            0,
            test_grader(),
            Arc::new(SessionStore::new()),
        )
        .await
        .expect("server should start")
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_test_server().await;
        assert!(server.addr.port() > 0);

        let url = format!("http://127.0.0.1:{}/health", server.addr.port());
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["backend_available"], true);

        server.shutdown();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn serves_grading_over_http() {
        let mut server = start_test_server().await;

        let client = reqwest::Client::new();
        let resp = client
            .post(format!("http://127.0.0.1:{}/grade", server.addr.port()))
            .json(&serde_json::json!({
                "student_response": "Water moves to the higher solute side.",
                "rubric": "1 point for direction of movement",
                "question_prompt": "Describe osmosis.",
                "max_points": 10
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["score"], serde_json::json!(6.0));
        assert_eq!(json["percentage"], serde_json::json!(60.0));

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_test_server().await;
        server.shutdown();
        server.shutdown();
    }
}
