//! Section prompts and input budgeting.
//!
//! Each analysis runs four independent prompts (summary, clauses, risks,
//! suggestions) so one malformed response cannot poison the others. Every
//! prompt demands raw JSON with no markdown fences; the parser still copes
//! when the model ignores that.

pub const SYSTEM_PROMPT: &str = "You are a legal contract analyst. You respond with raw JSON \
only: no markdown fences, no commentary, no text before or after the JSON.";

/// Clamp contract text to a character budget, preferring a paragraph
/// boundary, then a sentence boundary. A hard cut happens only when neither
/// exists in the second half of the window.
pub fn clamp_to_budget(text: &str, budget: usize) -> &str {
    if text.len() <= budget {
        return text;
    }

    let mut end = budget;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    let window = &text[..end];

    if let Some(i) = window.rfind("\n\n") {
        if i >= budget / 2 {
            return &text[..i];
        }
    }
    if let Some(i) = window.rfind(". ") {
        if i >= budget / 2 {
            return &text[..i + 1];
        }
    }
    window
}

pub fn summary_prompt(text: &str, contract_type: &str, jurisdiction: &str) -> String {
    format!(
        r#"Analyze this {contract_type} contract under {jurisdiction} law and summarize it.

Respond with exactly this JSON shape:
{{
  "overview": "2-3 sentence summary of the contract",
  "contract_type": "the contract type",
  "parties": ["party 1", "party 2"],
  "duration": "contract duration or term",
  "obligations": ["key obligation 1", "key obligation 2"],
  "financial_terms": "payment amounts and schedule",
  "jurisdiction": "governing jurisdiction"
}}

Contract text:
{text}"#
    )
}

pub fn clauses_prompt(text: &str, contract_type: &str, jurisdiction: &str) -> String {
    format!(
        r#"Identify every distinct clause in this {contract_type} contract ({jurisdiction}).

Respond with exactly this JSON shape:
{{
  "clauses": [
    {{"label": "clause category, e.g. Payment Terms", "text": "the clause language, verbatim or closely paraphrased"}}
  ]
}}

Contract text:
{text}"#
    )
}

pub fn risks_prompt(text: &str, contract_type: &str, jurisdiction: &str) -> String {
    format!(
        r#"Identify legal and business risks in this {contract_type} contract under {jurisdiction} law.

Respond with exactly this JSON shape:
{{
  "risks": [
    {{
      "related_clause_label": "clause the risk relates to",
      "severity": "low, medium, or high",
      "title": "short risk title",
      "description": "what the risk is",
      "impact": "consequence for the client if it materializes"
    }}
  ]
}}

Contract text:
{text}"#
    )
}

pub fn suggestions_prompt(text: &str, contract_type: &str, jurisdiction: &str) -> String {
    format!(
        r#"Suggest improvements to this {contract_type} contract for the {jurisdiction} jurisdiction.

Respond with exactly this JSON shape:
{{
  "suggestions": [
    {{
      "priority": "low, medium, or high",
      "category": "clause or area the suggestion concerns",
      "current_state": "what the contract currently says or omits",
      "suggested_text": "proposed replacement or addition",
      "business_impact": "why the change matters"
    }}
  ]
}}

Contract text:
{text}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_passes_through() {
        let text = "A short contract.";
        assert_eq!(clamp_to_budget(text, 8_000), text);
    }

    #[test]
    fn clamps_at_paragraph_boundary() {
        let text = format!("{}\n\n{}", "a".repeat(700), "b".repeat(600));
        let clamped = clamp_to_budget(&text, 1_000);
        assert_eq!(clamped.len(), 700);
        assert!(!clamped.contains('b'));
    }

    #[test]
    fn clamps_at_sentence_boundary_when_no_paragraph() {
        let text = format!("{}. {}", "a".repeat(800), "b".repeat(600));
        let clamped = clamp_to_budget(&text, 1_000);
        assert_eq!(clamped.len(), 801);
        assert!(clamped.ends_with('.'));
    }

    #[test]
    fn hard_cut_as_last_resort() {
        let text = "x".repeat(2_000);
        let clamped = clamp_to_budget(&text, 500);
        assert_eq!(clamped.len(), 500);
    }

    #[test]
    fn hard_cut_respects_char_boundaries() {
        let text = "é".repeat(1_000);
        let clamped = clamp_to_budget(&text, 501);
        assert_eq!(clamped.len(), 500);
        assert!(clamped.chars().all(|c| c == 'é'));
    }

    #[test]
    fn early_boundary_is_ignored() {
        // A paragraph break in the first half wastes too much of the budget.
        let text = format!("{}\n\n{}", "a".repeat(100), "b".repeat(2_000));
        let clamped = clamp_to_budget(&text, 1_000);
        assert_eq!(clamped.len(), 1_000);
    }

    #[test]
    fn prompts_embed_metadata_and_text() {
        let p = risks_prompt("payment due in 30 days", "SERVICE_AGREEMENT", "INDIA");
        assert!(p.contains("SERVICE_AGREEMENT"));
        assert!(p.contains("INDIA"));
        assert!(p.contains("payment due in 30 days"));
        assert!(p.contains("related_clause_label"));
    }
}
