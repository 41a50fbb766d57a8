//! In-memory job status store.
//!
//! The only mutable shared structure in the pipeline. Each job has a single
//! writer (its own pipeline task), so updates contend only on the map lock,
//! which is never held across an await point. Reads return cloned snapshots;
//! a poller can never observe a half-written record.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::models::ValidatedResult;

use super::{AnalysisJob, ErrorKind, JobId, JobState};

#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<JobId, AnalysisJob>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, job: AnalysisJob) -> JobId {
        let id = job.id;
        self.write().insert(id, job);
        id
    }

    /// Snapshot of a job's current record.
    pub fn get(&self, id: JobId) -> Option<AnalysisJob> {
        self.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Advance a job along a legal lifecycle edge. Illegal transitions are
    /// logged and dropped rather than applied.
    pub fn advance(&self, id: JobId, next: JobState) -> bool {
        let mut jobs = self.write();
        let Some(job) = jobs.get_mut(&id) else {
            tracing::warn!(job_id = %id, "Transition requested for unknown job");
            return false;
        };
        if !job.state.can_transition_to(next) {
            tracing::warn!(
                job_id = %id,
                from = %job.state,
                to = %next,
                "Illegal job transition ignored"
            );
            return false;
        }

        if job.started_at.is_none() {
            job.started_at = Some(Utc::now());
        }
        tracing::info!(job_id = %id, from = %job.state, to = %next, "Job transition");
        job.state = next;
        true
    }

    /// Terminal success: `Comparing -> Completed` with the validated result.
    pub fn complete(&self, id: JobId, result: ValidatedResult) -> bool {
        let mut jobs = self.write();
        let Some(job) = jobs.get_mut(&id) else {
            tracing::warn!(job_id = %id, "Completion requested for unknown job");
            return false;
        };
        if !job.state.can_transition_to(JobState::Completed) {
            tracing::warn!(job_id = %id, state = %job.state, "Cannot complete job from this state");
            return false;
        }

        job.state = JobState::Completed;
        job.result = Some(result);
        finish(job);
        tracing::info!(
            job_id = %id,
            seconds = job.processing_time_seconds,
            "Job completed"
        );
        true
    }

    /// Terminal failure from any non-terminal stage that permits it.
    pub fn fail(&self, id: JobId, kind: ErrorKind, detail: String) -> bool {
        let mut jobs = self.write();
        let Some(job) = jobs.get_mut(&id) else {
            tracing::warn!(job_id = %id, "Failure requested for unknown job");
            return false;
        };
        if !job.state.can_transition_to(JobState::Failed) {
            tracing::warn!(job_id = %id, state = %job.state, "Cannot fail job from this state");
            return false;
        }

        job.state = JobState::Failed;
        job.error_kind = Some(kind);
        job.error_detail = Some(detail.clone());
        finish(job);
        tracing::warn!(job_id = %id, kind = %kind, detail = %detail, "Job failed");
        true
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<JobId, AnalysisJob>> {
        match self.jobs.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<JobId, AnalysisJob>> {
        match self.jobs.write() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn finish(job: &mut AnalysisJob) {
    let now = Utc::now();
    job.finished_at = Some(now);
    let reference = job.started_at.unwrap_or(job.created_at);
    let elapsed = (now - reference).num_milliseconds().max(0) as f64 / 1000.0;
    job.processing_time_seconds = Some(elapsed);
}
