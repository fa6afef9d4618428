use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::LlmClient;
use super::GradingError;

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new OllamaClient pointing at a local Ollama instance.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default Ollama instance at localhost:11434 with 5-minute timeout.
    pub fn default_local() -> Self {
        Self::new("http://localhost:11434", 300)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Fixed decoding options sent with every generate call.
///
/// Grading must be repeatable: low temperature, pinned seed, CPU-only
/// execution (num_gpu 0), output capped at 2000 tokens.
#[derive(Debug, Clone, Serialize)]
struct DecodingOptions {
    temperature: f64,
    top_p: f64,
    top_k: u32,
    num_predict: u32,
    seed: u64,
    num_gpu: u32,
}

impl DecodingOptions {
    fn deterministic() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
            top_k: 40,
            num_predict: 2000,
            seed: 42,
            num_gpu: 0,
        }
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: DecodingOptions,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl OllamaClient {
    fn classify(&self, e: reqwest::Error) -> GradingError {
        if e.is_timeout() {
            GradingError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            GradingError::BackendConnection(self.base_url.clone())
        } else {
            GradingError::HttpClient(e.to_string())
        }
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, GradingError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
            options: DecodingOptions::deterministic(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GradingError::BackendStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| GradingError::ResponseDecoding(e.to_string()))?;

        Ok(parsed.response)
    }

    async fn is_model_available(&self, model: &str) -> Result<bool, GradingError> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }

    async fn list_models(&self) -> Result<Vec<String>, GradingError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GradingError::BackendStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| GradingError::ResponseDecoding(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Mock LLM client for testing — replays a script, then a default reply.
pub struct MockLlmClient {
    default_response: String,
    script: Mutex<VecDeque<Result<String, GradingError>>>,
    calls: Mutex<u32>,
    available_models: Vec<String>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            default_response: response.to_string(),
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(0),
            available_models: vec!["llama3.1:8b".to_string()],
        }
    }

    /// Queue a scripted outcome consumed before the default response.
    pub fn then(self, outcome: Result<String, GradingError>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(outcome);
        }
        self
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    /// How many generate calls have been made.
    pub fn call_count(&self) -> u32 {
        self.calls.lock().map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
    ) -> Result<String, GradingError> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        if let Ok(mut script) = self.script.lock() {
            if let Some(outcome) = script.pop_front() {
                return outcome;
            }
        }
        Ok(self.default_response.clone())
    }

    async fn is_model_available(&self, model: &str) -> Result<bool, GradingError> {
        Ok(self.available_models.iter().any(|m| m.starts_with(model)))
    }

    async fn list_models(&self) -> Result<Vec<String>, GradingError> {
        Ok(self.available_models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        let result = client.generate("model", "prompt", "system").await.unwrap();
        assert_eq!(result, "test response");
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn mock_client_replays_script_first() {
        let client = MockLlmClient::new("default")
            .then(Err(GradingError::Timeout(300)))
            .then(Ok("scripted".into()));

        assert!(matches!(
            client.generate("m", "p", "s").await,
            Err(GradingError::Timeout(300))
        ));
        assert_eq!(client.generate("m", "p", "s").await.unwrap(), "scripted");
        assert_eq!(client.generate("m", "p", "s").await.unwrap(), "default");
        assert_eq!(client.call_count(), 3);
    }

    #[tokio::test]
    async fn mock_client_lists_models() {
        let client = MockLlmClient::new("")
            .with_models(vec!["llama3.1:8b".into(), "mistral:7b".into()]);
        let models = client.list_models().await.unwrap();
        assert_eq!(models.len(), 2);
        assert!(client.is_model_available("llama3.1").await.unwrap());
        assert!(!client.is_model_available("qwen2.5").await.unwrap());
    }

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", 60);
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn default_local_uses_standard_port() {
        let client = OllamaClient::default_local();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.timeout_secs, 300);
    }

    #[test]
    fn decoding_options_are_deterministic() {
        let options = serde_json::to_value(DecodingOptions::deterministic()).unwrap();
        assert_eq!(options["temperature"], serde_json::json!(0.1));
        assert_eq!(options["top_p"], serde_json::json!(0.9));
        assert_eq!(options["top_k"], serde_json::json!(40));
        assert_eq!(options["num_predict"], serde_json::json!(2000));
        assert_eq!(options["seed"], serde_json::json!(42));
        assert_eq!(options["num_gpu"], serde_json::json!(0));
    }

    #[test]
    fn generate_request_serializes_options() {
        let body = OllamaGenerateRequest {
            model: "llama3.1:8b",
            prompt: "grade this",
            system: "you are a grader",
            stream: false,
            options: DecodingOptions::deterministic(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3.1:8b");
        assert_eq!(json["stream"], serde_json::json!(false));
        assert_eq!(json["options"]["seed"], serde_json::json!(42));
    }
}
