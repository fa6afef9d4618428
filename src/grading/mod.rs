pub mod types;
pub mod prompt;
pub mod parser;
pub mod retry;
pub mod ollama;
pub mod grader;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use retry::*;
pub use ollama::*;
pub use grader::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradingError {
    #[error("Model backend is not running at {0}")]
    BackendConnection(String),

    #[error("Model backend returned error (status {status}): {body}")]
    BackendStatus { status: u16, body: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response decoding error: {0}")]
    ResponseDecoding(String),
}

impl GradingError {
    /// Whether re-issuing the same request could succeed.
    ///
    /// Timeouts and transport failures are transient; a backend HTTP error
    /// or an undecodable body will not improve on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GradingError::Timeout(_)
                | GradingError::BackendConnection(_)
                | GradingError::HttpClient(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_transient() {
        assert!(GradingError::Timeout(300).is_transient());
        assert!(GradingError::BackendConnection("http://localhost:11434".into()).is_transient());
        assert!(GradingError::HttpClient("connection reset".into()).is_transient());
    }

    #[test]
    fn backend_status_is_not_transient() {
        let err = GradingError::BackendStatus {
            status: 404,
            body: "model not found".into(),
        };
        assert!(!err.is_transient());
        assert!(!GradingError::ResponseDecoding("bad json".into()).is_transient());
    }
}
