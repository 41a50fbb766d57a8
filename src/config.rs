//! Pipeline configuration.
//!
//! Tunable defaults for the analysis pipeline. Values are reference defaults,
//! not contracts; override per deployment via `from_env` or by mutating a
//! config before constructing the orchestrator.

pub const APP_NAME: &str = "ClauseGuard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "clauseguard=info"
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Model identifier sent to the chat endpoint.
    pub model: String,
    /// OpenAI-compatible API root, e.g. a local inference server.
    pub base_url: String,
    /// Bearer token for hosted providers; local servers need none.
    pub api_key: Option<String>,
    /// Hard bound on one analysis attempt (all four sections).
    pub request_timeout_secs: u64,
    /// Retries for transient transport failures only.
    pub max_retries: u32,
    /// First backoff delay; doubles per retry.
    pub retry_backoff_ms: u64,
    /// Held low and constant so repeated analyses stay comparable.
    pub temperature: f32,
    pub max_tokens: u32,
    /// Character budget for contract text per prompt.
    pub text_budget_chars: usize,
    /// Cosine similarity a clause must reach to match a standard template.
    pub similarity_threshold: f32,
    /// Candidate findings considered per template.
    pub top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: "llama3.1:8b".to_string(),
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: None,
            request_timeout_secs: 300,
            max_retries: 2,
            retry_backoff_ms: 500,
            temperature: 0.3,
            max_tokens: 2048,
            text_budget_chars: 8_000,
            similarity_threshold: 0.75,
            top_k: 3,
        }
    }
}

impl AnalysisConfig {
    /// Defaults with environment overrides:
    /// `CLAUSEGUARD_MODEL`, `CLAUSEGUARD_BASE_URL`, `CLAUSEGUARD_API_KEY`,
    /// `CLAUSEGUARD_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(model) = std::env::var("CLAUSEGUARD_MODEL") {
            config.model = model;
        }
        if let Ok(url) = std::env::var("CLAUSEGUARD_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(key) = std::env::var("CLAUSEGUARD_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Ok(secs) = std::env::var("CLAUSEGUARD_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.request_timeout_secs = secs;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.request_timeout_secs, 300);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.text_budget_chars, 8_000);
        assert!((config.similarity_threshold - 0.75).abs() < f32::EPSILON);
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn temperature_is_low_for_determinism() {
        assert!(AnalysisConfig::default().temperature <= 0.5);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
