use std::env;

/// Application-level constants
pub const APP_NAME: &str = "Rubriq";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default log filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "rubriq=info,tower_http=info"
}

/// Runtime configuration, read from the environment with sensible
/// defaults for a local Ollama setup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Ollama backend.
    pub ollama_url: String,
    /// Model used for grading and chat.
    pub model: String,
    /// Per-request timeout toward the backend, in seconds.
    pub timeout_secs: u64,
    /// Bounded attempt count for transient backend failures.
    pub max_attempts: u32,
    /// Port the HTTP service listens on.
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            ollama_url: env_string("RUBRIQ_OLLAMA_URL", "http://localhost:11434"),
            model: env_string("RUBRIQ_MODEL", "llama3.1:8b"),
            timeout_secs: env_parse("RUBRIQ_TIMEOUT_SECS", 300),
            max_attempts: env_parse("RUBRIQ_MAX_ATTEMPTS", 3),
            port: env_parse("RUBRIQ_PORT", 8000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".into(),
            model: "llama3.1:8b".into(),
            timeout_secs: 300,
            max_attempts: 3,
            port: 8000,
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Unset or unparseable values fall back to the default.
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_local_ollama() {
        let cfg = Config::default();
        assert_eq!(cfg.ollama_url, "http://localhost:11434");
        assert_eq!(cfg.timeout_secs, 300);
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.port, 8000);
    }

    #[test]
    fn env_string_prefers_set_value() {
        env::set_var("RUBRIQ_TEST_STR", "http://ollama:11434");
        assert_eq!(
            env_string("RUBRIQ_TEST_STR", "fallback"),
            "http://ollama:11434"
        );
        env::remove_var("RUBRIQ_TEST_STR");
        assert_eq!(env_string("RUBRIQ_TEST_STR", "fallback"), "fallback");
    }

    #[test]
    fn env_parse_falls_back_on_garbage() {
        env::set_var("RUBRIQ_TEST_NUM", "not-a-number");
        assert_eq!(env_parse("RUBRIQ_TEST_NUM", 42u32), 42);
        env::set_var("RUBRIQ_TEST_NUM", "7");
        assert_eq!(env_parse("RUBRIQ_TEST_NUM", 42u32), 7);
        env::remove_var("RUBRIQ_TEST_NUM");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(APP_NAME, "Rubriq");
    }
}
