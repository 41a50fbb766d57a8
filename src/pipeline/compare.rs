//! Standards comparison: which expected clauses are missing.
//!
//! Compares the document's validated clauses against the knowledge base's
//! templates for the (contract type, jurisdiction) pair. Matching combines a
//! direct label-containment check with cosine similarity over embeddings, so
//! "Payment Terms" matches "Pricing and Payment Terms" without a model call.
//! An unknown pair is a soft failure: empty result, never a job failure.

use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::knowledge::KnowledgeBase;
use crate::models::{ClauseFinding, MissingClause};

/// Produces unit-length vectors for similarity comparison. Implementations
/// must be deterministic: identical input, identical vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;
}

const EMBED_DIM: usize = 256;

/// Hashed bag-of-features embedder: word unigrams plus character trigrams,
/// folded into a fixed-width vector and L2-normalized. No model download,
/// fully deterministic; a transformer-backed `Embedder` can replace it
/// without touching the comparator.
pub struct LexicalEmbedder;

impl Embedder for LexicalEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; EMBED_DIM];
        let lowered = text.to_lowercase();

        for word in lowered.split(|c: char| !c.is_alphanumeric()) {
            if word.is_empty() {
                continue;
            }
            vector[bucket(word.as_bytes())] += 1.0;
            let bytes = word.as_bytes();
            if bytes.len() >= 3 {
                for gram in bytes.windows(3) {
                    vector[bucket(gram)] += 0.5;
                }
            }
        }

        normalize(&mut vector);
        vector
    }
}

/// FNV-1a bucket index. Stable across runs and platforms, unlike the
/// standard library's hashers.
fn bucket(bytes: &[u8]) -> usize {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    (hash % EMBED_DIM as u64) as usize
}

/// L2-normalize in place.
fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

pub struct StandardsComparator {
    knowledge: Arc<KnowledgeBase>,
    embedder: Arc<dyn Embedder>,
    threshold: f32,
    top_k: usize,
}

impl StandardsComparator {
    pub fn new(knowledge: Arc<KnowledgeBase>, embedder: Arc<dyn Embedder>, config: &AnalysisConfig) -> Self {
        Self {
            knowledge,
            embedder,
            threshold: config.similarity_threshold,
            top_k: config.top_k,
        }
    }

    /// All templates without a sufficiently similar document clause, tagged
    /// with their tier. Every tier is evaluated; callers may filter
    /// optional-tier entries as lower-priority signal.
    pub fn compare(
        &self,
        clauses: &[ClauseFinding],
        contract_type: &str,
        jurisdiction: &str,
    ) -> Vec<MissingClause> {
        let Some(set) = self.knowledge.lookup(contract_type, jurisdiction) else {
            tracing::warn!(
                contract_type,
                jurisdiction,
                "No standard clause set registered; skipping comparison"
            );
            return Vec::new();
        };

        let finding_vectors: Vec<Vec<f32>> = clauses
            .iter()
            .map(|c| self.embedder.embed(&finding_text(c)))
            .collect();

        let mut missing = Vec::new();
        for (template, tier) in set.templates() {
            let by_label = clauses
                .iter()
                .any(|c| labels_overlap(&c.label, &template.label));
            if by_label {
                continue;
            }

            let template_vector = self
                .embedder
                .embed(&format!("{} {}", template.label, template.reference_text));

            let mut similarities: Vec<f32> = finding_vectors
                .iter()
                .map(|v| cosine_similarity(v, &template_vector))
                .collect();
            similarities
                .sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
            similarities.truncate(self.top_k);

            let best = similarities.first().copied().unwrap_or(0.0);
            if best < self.threshold {
                tracing::debug!(
                    label = %template.label,
                    tier = %tier,
                    best_similarity = best,
                    "Standard clause not matched"
                );
                missing.push(MissingClause {
                    label: template.label.clone(),
                    category: tier,
                });
            }
        }

        tracing::info!(
            contract_type,
            jurisdiction,
            clauses = clauses.len(),
            missing = missing.len(),
            "Standards comparison finished"
        );
        missing
    }
}

fn finding_text(clause: &ClauseFinding) -> String {
    // Long clause bodies add noise without helping the label-level match.
    let mut text = clause.text.as_str();
    if let Some((i, _)) = text.char_indices().nth(512) {
        text = &text[..i];
    }
    format!("{} {}", clause.label, text)
}

/// Case-insensitive containment either way: "Payment Terms" matches
/// "Pricing and Payment Terms".
fn labels_overlap(found: &str, standard: &str) -> bool {
    let found = found.trim().to_lowercase();
    let standard = standard.trim().to_lowercase();
    if found.is_empty() || standard.is_empty() {
        return false;
    }
    found.contains(&standard) || standard.contains(&found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use crate::models::ClauseTier;

    fn comparator() -> StandardsComparator {
        StandardsComparator::new(
            Arc::new(KnowledgeBase::builtin()),
            Arc::new(LexicalEmbedder),
            &AnalysisConfig::default(),
        )
    }

    fn clause(label: &str, text: &str) -> ClauseFinding {
        ClauseFinding {
            label: label.into(),
            text: text.into(),
        }
    }

    #[test]
    fn embedder_is_unit_length_and_deterministic() {
        let a = LexicalEmbedder.embed("payment terms and invoicing schedule");
        let b = LexicalEmbedder.embed("payment terms and invoicing schedule");
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn identical_text_has_unit_similarity() {
        let a = LexicalEmbedder.embed("termination on sixty days notice");
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn related_text_scores_above_unrelated() {
        let payment = LexicalEmbedder.embed("payment terms fees invoicing schedule");
        let pricing = LexicalEmbedder.embed("pricing and payment terms invoicing");
        let weather = LexicalEmbedder.embed("the monsoon arrives in early june");
        assert!(
            cosine_similarity(&payment, &pricing) > cosine_similarity(&payment, &weather)
        );
    }

    #[test]
    fn unknown_pair_returns_empty() {
        let missing = comparator().compare(
            &[clause("Payment Terms", "Net 30.")],
            "LEASE",
            "INDIA",
        );
        assert!(missing.is_empty());
    }

    #[test]
    fn empty_clause_list_reports_all_templates_missing() {
        let kb = KnowledgeBase::builtin();
        let expected = kb.lookup("NDA", "INDIA").unwrap().len();
        let missing = comparator().compare(&[], "NDA", "INDIA");
        assert_eq!(missing.len(), expected);
        assert!(missing.iter().any(|m| m.category == ClauseTier::Critical));
        assert!(missing.iter().any(|m| m.category == ClauseTier::Optional));
    }

    #[test]
    fn label_containment_counts_as_match() {
        let clauses = vec![clause(
            "Pricing and Payment Terms",
            "Fees are payable within 30 days of invoice.",
        )];
        let missing = comparator().compare(&clauses, "SERVICE_AGREEMENT", "INDIA");
        assert!(!missing.iter().any(|m| m.label == "Payment Terms"));
    }

    #[test]
    fn exact_template_language_counts_as_match() {
        // A clause whose text mirrors the template reference scores near 1.0.
        let kb = KnowledgeBase::builtin();
        let set = kb.lookup("SERVICE_AGREEMENT", "INDIA").unwrap();
        let template = &set.critical[0];
        let clauses = vec![clause("Clause 1", &template.reference_text)];
        // Label "Clause 1" shares nothing with the template label, so this
        // exercises the similarity path.
        let missing = comparator().compare(&clauses, "SERVICE_AGREEMENT", "INDIA");
        assert!(!missing.iter().any(|m| m.label == template.label));
    }

    #[test]
    fn comparison_is_deterministic() {
        let clauses = vec![
            clause("Payment Terms", "Net 30 from invoice date."),
            clause("Confidentiality", "Mutual confidentiality for three years."),
        ];
        let first = comparator().compare(&clauses, "SERVICE_AGREEMENT", "INDIA");
        for _ in 0..5 {
            assert_eq!(comparator().compare(&clauses, "SERVICE_AGREEMENT", "INDIA"), first);
        }
    }

    #[test]
    fn matched_tiers_are_tagged() {
        let missing = comparator().compare(&[], "SERVICE_AGREEMENT", "INDIA");
        let critical: Vec<_> = missing
            .iter()
            .filter(|m| m.category == ClauseTier::Critical)
            .collect();
        assert_eq!(critical.len(), 6);
        assert!(critical.iter().any(|m| m.label == "Liability Limitation"));
    }
}
