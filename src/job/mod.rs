//! Analysis jobs and their lifecycle.
//!
//! One job per submitted document. The orchestrator is the only writer;
//! everything else reads snapshots through the store.

pub mod orchestrator;
pub mod store;

pub use orchestrator::*;
pub use store::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type JobId = Uuid;

/// Job lifecycle states. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Extracting,
    Analyzing,
    Validating,
    Comparing,
    Completed,
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Extracting => "extracting",
            JobState::Analyzing => "analyzing",
            JobState::Validating => "validating",
            JobState::Comparing => "comparing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    /// Legal lifecycle edges. Comparison cannot fail (comparator failures
    /// are soft), so `Comparing` only moves to `Completed`.
    pub fn can_transition_to(&self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Pending, Extracting)
                | (Extracting, Analyzing)
                | (Extracting, Failed)
                | (Analyzing, Validating)
                | (Analyzing, Failed)
                | (Validating, Comparing)
                | (Validating, Failed)
                | (Comparing, Completed)
        )
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure classification recorded on a failed job. Soft failures (no
/// standards mapping, weak matches) never produce one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ExtractionError,
    AnalysisTimeout,
    AnalysisServiceError,
    ValidationError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ExtractionError => "extraction_error",
            ErrorKind::AnalysisTimeout => "analysis_timeout",
            ErrorKind::AnalysisServiceError => "analysis_service_error",
            ErrorKind::ValidationError => "validation_error",
        }
    }

    /// Whether the caller should expect a resubmission to help.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ErrorKind::AnalysisTimeout | ErrorKind::AnalysisServiceError
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One analysis job. Inputs are immutable after creation; exactly one of
/// `result` / `error_detail` is populated once the job is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisJob {
    pub id: JobId,
    pub state: JobState,
    pub contract_type: String,
    pub jurisdiction: String,
    pub model: String,
    pub result: Option<crate::models::ValidatedResult>,
    pub error_kind: Option<ErrorKind>,
    pub error_detail: Option<String>,
    pub processing_time_seconds: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl AnalysisJob {
    pub fn new(contract_type: &str, jurisdiction: &str, model: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: JobState::Pending,
            contract_type: contract_type.to_string(),
            jurisdiction: jurisdiction.to_string(),
            model: model.to_string(),
            result: None,
            error_kind: None,
            error_detail: None,
            processing_time_seconds: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_edges_are_legal() {
        use JobState::*;
        assert!(Pending.can_transition_to(Extracting));
        assert!(Extracting.can_transition_to(Analyzing));
        assert!(Analyzing.can_transition_to(Validating));
        assert!(Validating.can_transition_to(Comparing));
        assert!(Comparing.can_transition_to(Completed));
    }

    #[test]
    fn failure_edges_are_legal() {
        use JobState::*;
        assert!(Extracting.can_transition_to(Failed));
        assert!(Analyzing.can_transition_to(Failed));
        assert!(Validating.can_transition_to(Failed));
    }

    #[test]
    fn comparing_cannot_fail() {
        assert!(!JobState::Comparing.can_transition_to(JobState::Failed));
    }

    #[test]
    fn terminal_states_are_sinks() {
        use JobState::*;
        for next in [Pending, Extracting, Analyzing, Validating, Comparing, Completed, Failed] {
            assert!(!Completed.can_transition_to(next));
            assert!(!Failed.can_transition_to(next));
        }
    }

    #[test]
    fn no_stage_skipping() {
        use JobState::*;
        assert!(!Pending.can_transition_to(Analyzing));
        assert!(!Extracting.can_transition_to(Comparing));
        assert!(!Analyzing.can_transition_to(Completed));
        // Validation precedes comparison.
        assert!(!Analyzing.can_transition_to(Comparing));
    }

    #[test]
    fn states_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&JobState::Extracting).unwrap(), "\"extracting\"");
        assert_eq!(
            serde_json::to_string(&ErrorKind::AnalysisTimeout).unwrap(),
            "\"analysis_timeout\""
        );
    }

    #[test]
    fn error_kind_transience() {
        assert!(ErrorKind::AnalysisTimeout.is_transient());
        assert!(ErrorKind::AnalysisServiceError.is_transient());
        assert!(!ErrorKind::ExtractionError.is_transient());
        assert!(!ErrorKind::ValidationError.is_transient());
    }

    #[test]
    fn new_job_is_pending_with_immutable_inputs() {
        let job = AnalysisJob::new("NDA", "INDIA", "test-model");
        assert_eq!(job.state, JobState::Pending);
        assert_eq!(job.contract_type, "NDA");
        assert!(job.result.is_none());
        assert!(job.error_kind.is_none());
        assert!(job.started_at.is_none());
    }
}
