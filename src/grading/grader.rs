use std::sync::Arc;

use super::parser::parse_grading_response;
use super::prompt::{build_grading_prompt, GRADING_SYSTEM_PROMPT};
use super::retry::RetryPolicy;
use super::types::{GradingRequest, GradingResult, LlmClient};
use super::GradingError;

/// Orchestrates the grading pipeline: prompt build → model invocation
/// with bounded retry → two-tier response parse.
///
/// The backend client is injected behind `LlmClient` so handlers can be
/// tested without a running Ollama instance.
pub struct Grader {
    client: Arc<dyn LlmClient>,
    model: String,
    retry: RetryPolicy,
}

impl Grader {
    pub fn new(client: Arc<dyn LlmClient>, model: String, retry: RetryPolicy) -> Self {
        Self {
            client,
            model,
            retry,
        }
    }

    /// The model name used for every invocation.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Grade a single request.
    ///
    /// Parsing never fails; the only error source is the model invocation
    /// itself after retries are exhausted.
    pub async fn grade(&self, request: &GradingRequest) -> Result<GradingResult, GradingError> {
        let prompt = build_grading_prompt(request);
        let raw = self.generate_reply(GRADING_SYSTEM_PROMPT, &prompt).await?;

        Ok(parse_grading_response(
            &raw,
            request.max_points,
            request.question_number.clone(),
        ))
    }

    /// Grade a list of requests strictly sequentially.
    ///
    /// A failed item yields a zero-score result carrying the error text as
    /// feedback; siblings are unaffected. Sequential on purpose — one
    /// in-flight model call at a time bounds backend load.
    pub async fn grade_batch(&self, requests: &[GradingRequest]) -> Vec<GradingResult> {
        let mut results = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            match self.grade(request).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(item = index, error = %e, "Batch item failed, recording zero score");
                    results.push(GradingResult::failed(
                        request.max_points,
                        &e.to_string(),
                        request.question_number.clone(),
                    ));
                }
            }
        }
        results
    }

    /// Invoke the model with the bounded retry policy.
    ///
    /// Also used by the chat endpoint with its own system prompt.
    pub async fn generate_reply(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, GradingError> {
        let mut attempt = 1;
        loop {
            match self.client.generate(&self.model, prompt, system).await {
                Ok(text) => return Ok(text),
                Err(e) if self.retry.should_retry(&e, attempt) => {
                    tracing::warn!(attempt, error = %e, "Model invocation failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Backend reachability probe for the health endpoint.
    pub async fn backend_available(&self) -> bool {
        self.client.list_models().await.is_ok()
    }
}
