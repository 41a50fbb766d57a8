//! Analysis client: four-section LLM analysis with a hard time budget.
//!
//! The raw payload it returns is deliberately untyped — the model may omit
//! sections, mislabel fields, or return prose instead of JSON. Only the
//! normalizer decides what is usable.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

use super::llm::{ChatClient, ChatRequest, LlmError};
use super::prompt;
use crate::config::AnalysisConfig;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analysis timed out after {0}s")]
    Timeout(u64),

    #[error("Analysis service failure: {0}")]
    Service(String),
}

impl AnalysisError {
    /// Transport-level failures are retryable; nothing else in the pipeline is.
    pub fn is_transient(&self) -> bool {
        matches!(self, AnalysisError::Timeout(_) | AnalysisError::Service(_))
    }
}

/// Untyped model output, one value per section. A section the model answered
/// with non-JSON text is carried as a JSON string so the normalizer can
/// degrade or reject it.
#[derive(Debug, Clone)]
pub struct RawAnalysisPayload {
    pub summary: Value,
    pub clauses: Value,
    pub risks: Value,
    pub suggestions: Value,
}

pub struct AnalysisClient {
    chat: Arc<dyn ChatClient>,
    config: AnalysisConfig,
}

impl AnalysisClient {
    pub fn new(chat: Arc<dyn ChatClient>, config: AnalysisConfig) -> Self {
        Self { chat, config }
    }

    /// Run the four section prompts against the model. The whole call is
    /// bounded by the configured timeout; a single attempt, retries belong
    /// to the orchestrator.
    pub async fn analyze(
        &self,
        text: &str,
        contract_type: &str,
        jurisdiction: &str,
        model: &str,
    ) -> Result<RawAnalysisPayload, AnalysisError> {
        let budget = self.config.text_budget_chars;
        let original_chars = text.len();
        let text = prompt::clamp_to_budget(text, budget);
        if text.len() < original_chars {
            tracing::info!(
                original_chars,
                clamped_chars = text.len(),
                budget,
                "Contract text clamped to prompt budget"
            );
        }

        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        match tokio::time::timeout(timeout, self.run_sections(text, contract_type, jurisdiction, model)).await
        {
            Ok(result) => result,
            Err(_) => Err(AnalysisError::Timeout(self.config.request_timeout_secs)),
        }
    }

    async fn run_sections(
        &self,
        text: &str,
        contract_type: &str,
        jurisdiction: &str,
        model: &str,
    ) -> Result<RawAnalysisPayload, AnalysisError> {
        let summary = self
            .section(model, prompt::summary_prompt(text, contract_type, jurisdiction))
            .await?;
        let clauses = self
            .section(model, prompt::clauses_prompt(text, contract_type, jurisdiction))
            .await?;
        let risks = self
            .section(model, prompt::risks_prompt(text, contract_type, jurisdiction))
            .await?;
        let suggestions = self
            .section(model, prompt::suggestions_prompt(text, contract_type, jurisdiction))
            .await?;

        Ok(RawAnalysisPayload {
            summary,
            clauses,
            risks,
            suggestions,
        })
    }

    async fn section(&self, model: &str, user_prompt: String) -> Result<Value, AnalysisError> {
        let request = ChatRequest {
            model: model.to_string(),
            system: prompt::SYSTEM_PROMPT.to_string(),
            user: user_prompt,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let raw = match self.chat.complete(&request).await {
            Ok(raw) => raw,
            Err(LlmError::Timeout(secs)) => return Err(AnalysisError::Timeout(secs)),
            Err(e) => return Err(AnalysisError::Service(e.to_string())),
        };

        Ok(parse_json_lenient(&raw))
    }
}

/// Strip a leading/trailing markdown code fence, if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the fence line.
    let rest = match rest.find('\n') {
        Some(i) => &rest[i + 1..],
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Best-effort JSON parse. Tries the fence-stripped text, then the outermost
/// `{...}` region, and finally carries the raw text as a JSON string.
pub fn parse_json_lenient(raw: &str) -> Value {
    let stripped = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        return value;
    }

    if let (Some(start), Some(end)) = (stripped.find('{'), stripped.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<Value>(&stripped[start..=end]) {
                return value;
            }
        }
    }

    Value::String(raw.to_string())
}
