//! Standard-clause knowledge base.
//!
//! Maps (contract type, jurisdiction) to tiered sets of reference clause
//! templates. Loaded once at startup, immutable while jobs run; `reload`
//! swaps the whole map atomically so in-flight comparisons keep the set
//! they started with.

pub mod builtin;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ClauseTier;

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Cannot read clause library {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed clause library: {0}")]
    Parse(String),
}

/// One reference clause: a label plus representative language used for
/// similarity comparison against document clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseTemplate {
    pub label: String,
    pub reference_text: String,
}

/// Tiered clause templates for one (contract type, jurisdiction) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardClauseSet {
    #[serde(default)]
    pub critical: Vec<ClauseTemplate>,
    #[serde(default)]
    pub important: Vec<ClauseTemplate>,
    #[serde(default)]
    pub optional: Vec<ClauseTemplate>,
}

impl StandardClauseSet {
    /// All templates in tier order, each tagged with its tier.
    pub fn templates(&self) -> impl Iterator<Item = (&ClauseTemplate, ClauseTier)> {
        self.critical
            .iter()
            .map(|t| (t, ClauseTier::Critical))
            .chain(self.important.iter().map(|t| (t, ClauseTier::Important)))
            .chain(self.optional.iter().map(|t| (t, ClauseTier::Optional)))
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.important.len() + self.optional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalized lookup key: uppercase, spaces and hyphens folded to underscores.
/// "Service Agreement" + "india" → "SERVICE_AGREEMENT_INDIA".
pub fn set_key(contract_type: &str, jurisdiction: &str) -> String {
    fn fold(s: &str) -> String {
        s.trim()
            .to_uppercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect()
    }
    format!("{}_{}", fold(contract_type), fold(jurisdiction))
}

type SetMap = HashMap<String, Arc<StandardClauseSet>>;

/// Process-wide clause library. Cheap to share (`Arc<KnowledgeBase>`);
/// lookups clone an `Arc` and never hold the lock beyond the map read.
#[derive(Debug)]
pub struct KnowledgeBase {
    sets: RwLock<Arc<SetMap>>,
}

impl KnowledgeBase {
    /// Library with the built-in clause sets.
    pub fn builtin() -> Self {
        Self::from_map(builtin::builtin_sets())
    }

    /// Empty library, useful when all sets come from a file.
    pub fn empty() -> Self {
        Self::from_map(HashMap::new())
    }

    fn from_map(map: SetMap) -> Self {
        Self {
            sets: RwLock::new(Arc::new(map)),
        }
    }

    /// Parse a JSON library: `{"SERVICE_AGREEMENT_INDIA": {"critical": [...], ...}}`.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let parsed: HashMap<String, StandardClauseSet> =
            serde_json::from_str(json).map_err(|e| KnowledgeError::Parse(e.to_string()))?;
        let map = parsed
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), Arc::new(v)))
            .collect();
        Ok(Self::from_map(map))
    }

    pub fn load_from_file(path: &Path) -> Result<Self, KnowledgeError> {
        let json = std::fs::read_to_string(path).map_err(|source| KnowledgeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let kb = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            sets = kb.len(),
            "Loaded standard clause library"
        );
        Ok(kb)
    }

    /// Replace the whole library from a file. In-flight comparisons keep the
    /// `Arc` they already resolved.
    pub fn reload_from_file(&self, path: &Path) -> Result<(), KnowledgeError> {
        let fresh = Self::load_from_file(path)?;
        let map = fresh.snapshot();
        *write_lock(&self.sets) = map;
        Ok(())
    }

    /// Resolve the clause set for a (contract type, jurisdiction) pair.
    /// `None` when the pair has no registered set.
    pub fn lookup(&self, contract_type: &str, jurisdiction: &str) -> Option<Arc<StandardClauseSet>> {
        let key = set_key(contract_type, jurisdiction);
        read_lock(&self.sets).get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        read_lock(&self.sets).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Arc<SetMap> {
        read_lock(&self.sets).clone()
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn set_key_normalizes_case_and_spaces() {
        assert_eq!(set_key("Service Agreement", "India"), "SERVICE_AGREEMENT_INDIA");
        assert_eq!(set_key("NDA", "INDIA"), "NDA_INDIA");
        assert_eq!(set_key(" vendor-agreement ", "india"), "VENDOR_AGREEMENT_INDIA");
    }

    #[test]
    fn builtin_library_covers_known_pairs() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.lookup("SERVICE_AGREEMENT", "INDIA").is_some());
        assert!(kb.lookup("EMPLOYMENT", "INDIA").is_some());
        assert!(kb.lookup("NDA", "INDIA").is_some());
        assert!(kb.lookup("PARTNERSHIP", "INDIA").is_some());
        assert!(kb.lookup("VENDOR_AGREEMENT", "INDIA").is_some());
    }

    #[test]
    fn lookup_unknown_pair_returns_none() {
        let kb = KnowledgeBase::builtin();
        assert!(kb.lookup("LEASE", "INDIA").is_none());
        assert!(kb.lookup("SERVICE_AGREEMENT", "ATLANTIS").is_none());
    }

    #[test]
    fn builtin_sets_have_all_tiers() {
        let kb = KnowledgeBase::builtin();
        let set = kb.lookup("SERVICE_AGREEMENT", "INDIA").unwrap();
        assert!(!set.critical.is_empty());
        assert!(!set.important.is_empty());
        assert!(!set.optional.is_empty());
        assert!(set
            .critical
            .iter()
            .any(|t| t.label == "Payment Terms"));
    }

    #[test]
    fn templates_iterate_critical_first() {
        let set = StandardClauseSet {
            critical: vec![ClauseTemplate {
                label: "A".into(),
                reference_text: "a".into(),
            }],
            important: vec![ClauseTemplate {
                label: "B".into(),
                reference_text: "b".into(),
            }],
            optional: vec![],
        };
        let tiers: Vec<ClauseTier> = set.templates().map(|(_, tier)| tier).collect();
        assert_eq!(tiers, vec![ClauseTier::Critical, ClauseTier::Important]);
    }

    #[test]
    fn parses_json_library() {
        let json = r#"{
            "LEASE_INDIA": {
                "critical": [{"label": "Rent", "reference_text": "Monthly rent and due date."}],
                "important": []
            }
        }"#;
        let kb = KnowledgeBase::from_json_str(json).unwrap();
        let set = kb.lookup("LEASE", "INDIA").unwrap();
        assert_eq!(set.critical.len(), 1);
        assert!(set.optional.is_empty());
    }

    #[test]
    fn rejects_malformed_library() {
        let err = KnowledgeBase::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, KnowledgeError::Parse(_)));
    }

    #[test]
    fn reload_replaces_sets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"LEASE_INDIA": {{"critical": [{{"label": "Rent", "reference_text": "Rent."}}]}}}}"#
        )
        .unwrap();

        let kb = KnowledgeBase::builtin();
        assert!(kb.lookup("LEASE", "INDIA").is_none());
        kb.reload_from_file(file.path()).unwrap();
        assert!(kb.lookup("LEASE", "INDIA").is_some());
        assert!(kb.lookup("SERVICE_AGREEMENT", "INDIA").is_none());
    }

    #[test]
    fn load_missing_file_fails_with_io() {
        let err = KnowledgeBase::load_from_file(Path::new("/nonexistent/library.json")).unwrap_err();
        assert!(matches!(err, KnowledgeError::Io { .. }));
    }
}
