use super::GradingError;

/// Bounded-attempt retry policy for model invocations.
///
/// Each retry is an immediate re-issue of the same request — no backoff.
/// Only transient failures (timeout, transport) qualify; a backend HTTP
/// error surfaces immediately.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether `attempt` (1-based) should be followed by another try.
    pub fn should_retry(&self, error: &GradingError, attempt: u32) -> bool {
        attempt < self.max_attempts && error.is_transient()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_three_attempts() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 3);

        let err = GradingError::Timeout(300);
        assert!(policy.should_retry(&err, 1));
        assert!(policy.should_retry(&err, 2));
        assert!(!policy.should_retry(&err, 3));
    }

    #[test]
    fn backend_http_error_never_retried() {
        let policy = RetryPolicy::default();
        let err = GradingError::BackendStatus {
            status: 500,
            body: "model crashed".into(),
        };
        assert!(!policy.should_retry(&err, 1));
    }

    #[test]
    fn transport_error_retried() {
        let policy = RetryPolicy::default();
        let err = GradingError::HttpClient("connection reset by peer".into());
        assert!(policy.should_retry(&err, 1));
    }

    #[test]
    fn zero_attempts_normalized_to_one() {
        let policy = RetryPolicy::new(0);
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.should_retry(&GradingError::Timeout(300), 1));
    }
}
