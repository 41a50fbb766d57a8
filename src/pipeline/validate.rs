//! Schema validation and normalization of raw model output.
//!
//! Guarantees every downstream consumer sees the same shape no matter how
//! malformed the model response was. Sections degrade independently to
//! empty-but-well-formed defaults; only an unusable summary fails the whole
//! normalization, since a result with no overview is not worth persisting.

use serde_json::Value;
use thiserror::Error;

use super::analyze::RawAnalysisPayload;
use crate::models::{
    ClauseFinding, ClausesSection, Priority, RiskFinding, RisksSection, Severity,
    SuggestionFinding, SuggestionsSection, SummarySection, ValidatedResult,
};

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Summary section unusable: {0}")]
    SummaryUnusable(String),
}

/// Normalize a raw payload into the validated result shape. Pure function.
pub fn normalize(raw: &RawAnalysisPayload) -> Result<ValidatedResult, ValidationError> {
    let summary = normalize_summary(&raw.summary)?;
    let clauses = normalize_clauses(&raw.clauses);
    let risks = normalize_risks(&raw.risks);
    let suggestions = normalize_suggestions(&raw.suggestions);

    tracing::debug!(
        clauses = clauses.total_clauses,
        risks = risks.total_risks,
        suggestions = suggestions.total_suggestions,
        "Normalized analysis payload"
    );

    Ok(ValidatedResult {
        summary,
        clauses,
        risks,
        suggestions,
    })
}

fn normalize_summary(value: &Value) -> Result<SummarySection, ValidationError> {
    let Some(obj) = value.as_object() else {
        return Err(ValidationError::SummaryUnusable(
            "summary section is not a JSON object".into(),
        ));
    };

    let overview = str_field(obj, &["overview", "summary"]);
    if overview.is_empty() {
        return Err(ValidationError::SummaryUnusable(
            "no usable overview text".into(),
        ));
    }

    Ok(SummarySection {
        overview,
        contract_type: str_field(obj, &["contract_type", "type"]),
        parties: string_list(obj.get("parties")),
        duration: str_field(obj, &["duration", "term"]),
        obligations: string_list(
            obj.get("obligations")
                .or_else(|| obj.get("key_obligations")),
        ),
        financial_terms: str_field(obj, &["financial_terms", "financials"]),
        jurisdiction: str_field(obj, &["jurisdiction", "governing_law"]),
    })
}

fn normalize_clauses(value: &Value) -> ClausesSection {
    let items = item_list(value, &["clauses", "items"])
        .into_iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let label = str_field(obj, &["label", "clause_type", "type", "name"]);
            let text = str_field(obj, &["text", "clause_text", "content"]);
            if label.is_empty() && text.is_empty() {
                return None;
            }
            Some(ClauseFinding { label, text })
        })
        .collect();
    ClausesSection::from_items(items)
}

fn normalize_risks(value: &Value) -> RisksSection {
    let items = item_list(value, &["risks", "items"])
        .into_iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let title = str_field(obj, &["title", "risk", "name"]);
            let description = str_field(obj, &["description", "detail", "details"]);
            if title.is_empty() && description.is_empty() {
                return None;
            }
            Some(RiskFinding {
                related_clause_label: str_field(
                    obj,
                    &["related_clause_label", "related_clause", "clause"],
                ),
                severity: Severity::parse_lenient(&str_field(obj, &["severity", "level"])),
                title,
                description,
                impact: str_field(obj, &["impact", "consequence"]),
            })
        })
        .collect();
    RisksSection::from_items(items)
}

fn normalize_suggestions(value: &Value) -> SuggestionsSection {
    let items = item_list(value, &["suggestions", "items"])
        .into_iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let suggested_text = str_field(obj, &["suggested_text", "suggestion", "proposed_text"]);
            let current_state = str_field(obj, &["current_state", "current"]);
            if suggested_text.is_empty() && current_state.is_empty() {
                return None;
            }
            Some(SuggestionFinding {
                priority: Priority::parse_lenient(&str_field(obj, &["priority"])),
                category: str_field(obj, &["category", "area"]),
                current_state,
                suggested_text,
                business_impact: str_field(obj, &["business_impact", "impact"]),
            })
        })
        .collect();
    SuggestionsSection::from_items(items)
}

/// First present key coerced to a trimmed string. Numbers and booleans are
/// stringified; anything else yields the empty string.
fn str_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> String {
    for key in keys {
        match obj.get(*key) {
            Some(Value::String(s)) => {
                let s = s.trim();
                if !s.is_empty() {
                    return s.to_string();
                }
            }
            Some(Value::Number(n)) => return n.to_string(),
            Some(Value::Bool(b)) => return b.to_string(),
            _ => continue,
        }
    }
    String::new()
}

/// A list of strings, tolerating a single bare string and skipping
/// non-string elements.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Extract the section's item array: either the value itself is an array or
/// it is an object holding one under a known key.
fn item_list(value: &Value, keys: &[&str]) -> Vec<Value> {
    if let Some(items) = value.as_array() {
        return items.clone();
    }
    if let Some(obj) = value.as_object() {
        for key in keys {
            if let Some(Value::Array(items)) = obj.get(*key) {
                return items.clone();
            }
        }
    }
    Vec::new()
}
