//! Analysis job orchestrator.
//!
//! Owns every state transition for a job. `submit` spawns one independent
//! pipeline task per job and returns immediately; `get_status` serves
//! snapshots and reports failure as data, never as an error to the poller.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AnalysisConfig;
use crate::knowledge::KnowledgeBase;
use crate::pipeline::analyze::{AnalysisClient, AnalysisError, RawAnalysisPayload};
use crate::pipeline::compare::{Embedder, LexicalEmbedder, StandardsComparator};
use crate::pipeline::extract::DocumentExtractor;
use crate::pipeline::llm::ChatClient;
use crate::pipeline::validate;

use super::store::JobStore;
use super::{AnalysisJob, ErrorKind, JobId, JobState};

pub struct Orchestrator {
    store: Arc<JobStore>,
    extractor: Arc<dyn DocumentExtractor>,
    analyzer: Arc<AnalysisClient>,
    comparator: Arc<StandardsComparator>,
    config: AnalysisConfig,
}

impl Orchestrator {
    pub fn new(
        extractor: Arc<dyn DocumentExtractor>,
        chat: Arc<dyn ChatClient>,
        knowledge: Arc<KnowledgeBase>,
        config: AnalysisConfig,
    ) -> Self {
        Self::with_embedder(extractor, chat, knowledge, Arc::new(LexicalEmbedder), config)
    }

    pub fn with_embedder(
        extractor: Arc<dyn DocumentExtractor>,
        chat: Arc<dyn ChatClient>,
        knowledge: Arc<KnowledgeBase>,
        embedder: Arc<dyn Embedder>,
        config: AnalysisConfig,
    ) -> Self {
        let analyzer = Arc::new(AnalysisClient::new(chat, config.clone()));
        let comparator = Arc::new(StandardsComparator::new(knowledge, embedder, &config));
        Self {
            store: Arc::new(JobStore::new()),
            extractor,
            analyzer,
            comparator,
            config,
        }
    }

    /// Create a job and start its pipeline. Returns before the pipeline runs;
    /// every submission is an independent job, even for identical documents.
    pub fn submit(
        &self,
        handle: PathBuf,
        contract_type: &str,
        jurisdiction: &str,
        model: Option<&str>,
    ) -> JobId {
        let model = model.unwrap_or(&self.config.model);
        let job = AnalysisJob::new(contract_type, jurisdiction, model);
        let id = self.store.insert(job);
        tracing::info!(
            job_id = %id,
            contract_type,
            jurisdiction,
            model,
            "Job submitted"
        );

        let store = self.store.clone();
        let extractor = self.extractor.clone();
        let analyzer = self.analyzer.clone();
        let comparator = self.comparator.clone();
        let config = self.config.clone();
        let contract_type = contract_type.to_string();
        let jurisdiction = jurisdiction.to_string();
        let model = model.to_string();

        tokio::spawn(async move {
            run_pipeline(
                store,
                extractor,
                analyzer,
                comparator,
                config,
                id,
                handle,
                contract_type,
                jurisdiction,
                model,
            )
            .await;
        });

        id
    }

    /// Read-only snapshot of a job. `None` for an unknown id.
    pub fn get_status(&self, id: JobId) -> Option<AnalysisJob> {
        self.store.get(id)
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_pipeline(
    store: Arc<JobStore>,
    extractor: Arc<dyn DocumentExtractor>,
    analyzer: Arc<AnalysisClient>,
    comparator: Arc<StandardsComparator>,
    config: AnalysisConfig,
    id: JobId,
    handle: PathBuf,
    contract_type: String,
    jurisdiction: String,
    model: String,
) {
    store.advance(id, JobState::Extracting);
    let extraction = tokio::task::spawn_blocking(move || extractor.extract(&handle)).await;
    let text = match extraction {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            store.fail(id, ErrorKind::ExtractionError, e.to_string());
            return;
        }
        Err(e) => {
            store.fail(id, ErrorKind::ExtractionError, format!("extraction task failed: {e}"));
            return;
        }
    };

    store.advance(id, JobState::Analyzing);
    let raw = match analyze_with_retry(&analyzer, &config, id, &text, &contract_type, &jurisdiction, &model)
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            let kind = match e {
                AnalysisError::Timeout(_) => ErrorKind::AnalysisTimeout,
                AnalysisError::Service(_) => ErrorKind::AnalysisServiceError,
            };
            store.fail(id, kind, e.to_string());
            return;
        }
    };

    store.advance(id, JobState::Validating);
    let mut result = match validate::normalize(&raw) {
        Ok(result) => result,
        Err(e) => {
            store.fail(id, ErrorKind::ValidationError, e.to_string());
            return;
        }
    };

    store.advance(id, JobState::Comparing);
    let missing = comparator.compare(&result.clauses.items, &contract_type, &jurisdiction);
    result.risks.set_missing_clauses(missing);

    store.complete(id, result);
}

/// Retry only transient transport failures, with doubling backoff. The
/// timeout inside each attempt already bounds its duration.
async fn analyze_with_retry(
    analyzer: &AnalysisClient,
    config: &AnalysisConfig,
    id: JobId,
    text: &str,
    contract_type: &str,
    jurisdiction: &str,
    model: &str,
) -> Result<RawAnalysisPayload, AnalysisError> {
    let attempts = config.max_retries + 1;
    let mut backoff = Duration::from_millis(config.retry_backoff_ms);

    for attempt in 1..=attempts {
        match analyzer.analyze(text, contract_type, jurisdiction, model).await {
            Ok(payload) => return Ok(payload),
            Err(e) if e.is_transient() && attempt < attempts => {
                tracing::warn!(
                    job_id = %id,
                    attempt,
                    max_attempts = attempts,
                    error = %e,
                    "Analysis attempt failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
            Err(e) => return Err(e),
        }
    }

    // attempts >= 1, so the loop always returns first.
    Err(AnalysisError::Service("no analysis attempts configured".into()))
}
