//! Validated analysis result types.
//!
//! Everything downstream of the normalizer (status store, comparator, polling
//! callers) sees only these shapes. Count fields are always derived from the
//! lists they describe, never taken from model output.

use serde::{Deserialize, Serialize};

/// Risk severity, ordered LOW < MEDIUM < HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Case-insensitive parse; anything unrecognized maps to `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" | "moderate" => Severity::Medium,
            "high" | "critical" | "severe" => Severity::High,
            _ => Severity::Medium,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Suggestion priority, ordered LOW < MEDIUM < HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Case-insensitive parse; anything unrecognized maps to `Low`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "low" | "minor" => Priority::Low,
            "medium" | "moderate" => Priority::Medium,
            "high" | "urgent" | "critical" => Priority::High,
            _ => Priority::Low,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tier of a standard clause template: critical = must have,
/// important = should have, optional = nice to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseTier {
    Critical,
    Important,
    Optional,
}

impl ClauseTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseTier::Critical => "critical",
            ClauseTier::Important => "important",
            ClauseTier::Optional => "optional",
        }
    }
}

impl std::fmt::Display for ClauseTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One clause identified in the document. Duplicate labels are allowed;
/// order is discovery order from the model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseFinding {
    pub label: String,
    pub text: String,
}

/// One risk the model flagged against a clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFinding {
    pub related_clause_label: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub impact: String,
}

/// A standard clause with no sufficiently similar match in the document.
/// Produced by the comparator, never by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingClause {
    pub label: String,
    pub category: ClauseTier,
}

/// One improvement suggestion from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionFinding {
    pub priority: Priority,
    pub category: String,
    pub current_state: String,
    pub suggested_text: String,
    pub business_impact: String,
}

/// Contract overview. `overview` is the only field that must be non-empty;
/// a payload without a usable overview fails validation outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarySection {
    pub overview: String,
    pub contract_type: String,
    pub parties: Vec<String>,
    pub duration: String,
    pub obligations: Vec<String>,
    pub financial_terms: String,
    pub jurisdiction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClausesSection {
    pub items: Vec<ClauseFinding>,
    pub total_clauses: usize,
}

impl ClausesSection {
    pub fn from_items(items: Vec<ClauseFinding>) -> Self {
        let total_clauses = items.len();
        Self { items, total_clauses }
    }

    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RisksSection {
    pub items: Vec<RiskFinding>,
    pub missing_clauses: Vec<MissingClause>,
    pub total_risks: usize,
    pub total_missing: usize,
}

impl RisksSection {
    pub fn from_items(items: Vec<RiskFinding>) -> Self {
        let total_risks = items.len();
        Self {
            items,
            missing_clauses: Vec::new(),
            total_risks,
            total_missing: 0,
        }
    }

    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }

    /// Attach comparator output, keeping the derived count in step.
    pub fn set_missing_clauses(&mut self, missing: Vec<MissingClause>) {
        self.total_missing = missing.len();
        self.missing_clauses = missing;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsSection {
    pub items: Vec<SuggestionFinding>,
    pub total_suggestions: usize,
}

impl SuggestionsSection {
    pub fn from_items(items: Vec<SuggestionFinding>) -> Self {
        let total_suggestions = items.len();
        Self { items, total_suggestions }
    }

    pub fn empty() -> Self {
        Self::from_items(Vec::new())
    }
}

/// The full validated analysis result, one per completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedResult {
    pub summary: SummarySection,
    pub clauses: ClausesSection,
    pub risks: RisksSection,
    pub suggestions: SuggestionsSection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_case_insensitive() {
        assert_eq!(Severity::parse_lenient("HIGH"), Severity::High);
        assert_eq!(Severity::parse_lenient("Low"), Severity::Low);
        assert_eq!(Severity::parse_lenient("  medium "), Severity::Medium);
    }

    #[test]
    fn unknown_severity_defaults_to_medium() {
        assert_eq!(Severity::parse_lenient("catastrophic?!"), Severity::Medium);
        assert_eq!(Severity::parse_lenient(""), Severity::Medium);
    }

    #[test]
    fn unknown_priority_defaults_to_low() {
        assert_eq!(Priority::parse_lenient("whenever"), Priority::Low);
        assert_eq!(Priority::parse_lenient("URGENT"), Priority::High);
    }

    #[test]
    fn severity_orders_low_to_high() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
    }

    #[test]
    fn section_counts_derive_from_items() {
        let clauses = ClausesSection::from_items(vec![
            ClauseFinding {
                label: "Payment Terms".into(),
                text: "Net 30 from invoice date.".into(),
            },
            ClauseFinding {
                label: "Confidentiality".into(),
                text: "Both parties shall keep terms confidential.".into(),
            },
        ]);
        assert_eq!(clauses.total_clauses, 2);

        let mut risks = RisksSection::empty();
        assert_eq!(risks.total_risks, 0);
        risks.set_missing_clauses(vec![MissingClause {
            label: "Dispute Resolution".into(),
            category: ClauseTier::Important,
        }]);
        assert_eq!(risks.total_missing, 1);
    }

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"low\"");
        assert_eq!(
            serde_json::to_string(&ClauseTier::Critical).unwrap(),
            "\"critical\""
        );
    }

    #[test]
    fn missing_clause_round_trips() {
        let missing = MissingClause {
            label: "Liability Limitation".into(),
            category: ClauseTier::Critical,
        };
        let json = serde_json::to_string(&missing).unwrap();
        let back: MissingClause = serde_json::from_str(&json).unwrap();
        assert_eq!(back, missing);
    }
}
