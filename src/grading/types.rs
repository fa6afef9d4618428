use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GradingError;

/// A single FRQ grading request. Constructed per call, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingRequest {
    pub student_response: String,
    pub rubric: String,
    pub question_prompt: String,
    pub max_points: u32,
    #[serde(default)]
    pub question_number: Option<String>,
}

impl GradingRequest {
    /// Validate request fields beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), String> {
        if self.student_response.trim().is_empty() {
            return Err("student_response cannot be empty".into());
        }
        if self.max_points == 0 || self.max_points > 100 {
            return Err("max_points must be between 1 and 100".into());
        }
        Ok(())
    }
}

/// Structured grading outcome. Created once per grading call.
///
/// Invariant: `score` always lies within `[0, max_points]` and `percentage`
/// is consistent with `score / max_points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingResult {
    pub score: f64,
    pub max_points: f64,
    pub percentage: f64,
    pub feedback: String,
    pub rubric_alignment: BTreeMap<String, f64>,
    pub timestamp: String,
    #[serde(default)]
    pub question_number: Option<String>,
}

impl GradingResult {
    /// Build a result, clamping the score into `[0, max_points]` and
    /// deriving the percentage (rounded to 2 decimals, 0 when max is 0).
    pub fn new(
        score: f64,
        max_points: u32,
        feedback: String,
        rubric_alignment: BTreeMap<String, f64>,
        question_number: Option<String>,
    ) -> Self {
        let max = f64::from(max_points);
        let score = score.clamp(0.0, max);
        let percentage = if max_points == 0 {
            0.0
        } else {
            round2(score / max * 100.0)
        };

        Self {
            score,
            max_points: max,
            percentage,
            feedback,
            rubric_alignment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            question_number,
        }
    }

    /// Zero-score result carrying the failure text as feedback.
    ///
    /// Used by batch grading to isolate per-item failures instead of
    /// aborting the batch.
    pub fn failed(max_points: u32, error: &str, question_number: Option<String>) -> Self {
        Self::new(
            0.0,
            max_points,
            format!("Grading failed: {error}"),
            BTreeMap::new(),
            question_number,
        )
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Model backend abstraction (allows mocking).
///
/// The backend accepts a prompt plus system prompt and returns generated
/// text synchronously within the configured timeout.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, GradingError>;

    async fn is_model_available(&self, model: &str) -> Result<bool, GradingError>;

    async fn list_models(&self) -> Result<Vec<String>, GradingError>;
}
