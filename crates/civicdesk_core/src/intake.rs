//! Complaint Intake v0.4.0
//!
//! The pipeline tying the pieces together:
//! 1. decide a department (text classifier, or label scorer for images)
//! 2. search that department's open complaints for a restatement
//! 3. merge into the matched root, or open a new root
//!
//! Transcripts are plain text to this pipeline; the speech collaborator keeps
//! its own entry point only so call sites stay readable.

use crate::classifier::{Classification, DepartmentClassifier};
use crate::complaint::Complaint;
use crate::config::CoreConfig;
use crate::dedup::find_duplicate;
use crate::labels::LabelDepartmentScorer;
use crate::repository::{ComplaintRepository, RepositoryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Intake failures.
///
/// Missing or empty text is not one of them: it normalizes to the empty
/// string, classifies below threshold and files under `Unknown` for manual
/// triage.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    /// Storage failure, passed through verbatim.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// An upstream collaborator handed us input it already knows is bad
    /// (e.g. an unrecognized audio encoding). Passed through unmodified.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
}

/// What happened to a submitted report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeOutcome {
    /// First sighting: a new root complaint was opened.
    Created { complaint: Complaint },
    /// The report restated an open complaint and was folded into it.
    Merged { root: Complaint, score: f64 },
}

impl IntakeOutcome {
    /// The persisted root record, whichever way the report went.
    pub fn complaint(&self) -> &Complaint {
        match self {
            Self::Created { complaint } => complaint,
            Self::Merged { root, .. } => root,
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, Self::Merged { .. })
    }
}

/// Outcome plus the routing evidence, for callers that audit decisions or
/// send `Unknown` departments to manual triage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeResult {
    pub outcome: IntakeOutcome,
    pub department: String,
    /// Present for the text/transcript path; `None` for the label path.
    pub classification: Option<Classification>,
}

/// Complaint intake pipeline.
///
/// Owns the trained classifier and the label scorer; the repository is shared
/// with whatever else persists complaints. Construct once at startup.
pub struct ComplaintIntake {
    repository: Arc<dyn ComplaintRepository>,
    classifier: DepartmentClassifier,
    label_scorer: LabelDepartmentScorer,
    similarity_threshold: f64,
}

impl ComplaintIntake {
    /// Build the pipeline from configuration, training the classifier.
    pub fn new(repository: Arc<dyn ComplaintRepository>, config: &CoreConfig) -> Self {
        Self {
            repository,
            classifier: config.build_classifier(),
            label_scorer: config.build_label_scorer(),
            similarity_threshold: config.dedup.similarity_threshold,
        }
    }

    /// Submit a free-text report.
    pub async fn submit_text(
        &self,
        text: &str,
        reporter_user_id: &str,
    ) -> Result<IntakeResult, IntakeError> {
        let classification = self.classifier.classify(text);
        let department = classification.department.clone();
        let outcome = self.file_report(text, &department, reporter_user_id).await?;
        Ok(IntakeResult {
            outcome,
            department,
            classification: Some(classification),
        })
    }

    /// Submit a transcript produced by the speech collaborator.
    pub async fn submit_transcript(
        &self,
        transcript: &str,
        reporter_user_id: &str,
    ) -> Result<IntakeResult, IntakeError> {
        self.submit_text(transcript, reporter_user_id).await
    }

    /// Submit an image-derived report.
    ///
    /// `labels` must already be filtered (see [`crate::labels::LabelFilter`]).
    /// The caption, when given, becomes the complaint text for dedup; without
    /// one the joined labels stand in. An empty submission (no labels, no
    /// caption) is unsupported input: there is nothing to file.
    pub async fn submit_labels(
        &self,
        labels: &[String],
        caption: Option<&str>,
        reporter_user_id: &str,
    ) -> Result<IntakeResult, IntakeError> {
        let text = match caption {
            Some(caption) if !caption.trim().is_empty() => caption.to_string(),
            _ if labels.is_empty() => {
                return Err(IntakeError::UnsupportedInput(
                    "image report with no labels and no caption".to_string(),
                ))
            }
            _ => labels.join(" "),
        };

        let department = self.label_scorer.score(labels).display_name().to_string();
        let outcome = self.file_report(&text, &department, reporter_user_id).await?;
        Ok(IntakeResult {
            outcome,
            department,
            classification: None,
        })
    }

    /// Dedup-then-persist for an already-routed report.
    async fn file_report(
        &self,
        text: &str,
        department: &str,
        reporter_user_id: &str,
    ) -> Result<IntakeOutcome, IntakeError> {
        let matched = find_duplicate(
            self.repository.as_ref(),
            text,
            department,
            self.similarity_threshold,
        )
        .await?;

        if let Some(found) = matched {
            let mut root = found.complaint;
            root.absorb_report(reporter_user_id);
            let root = self.repository.save(root).await?;
            info!(
                "merged report from {} into complaint {} ({} reports)",
                reporter_user_id, root.id, root.duplicate_count
            );
            return Ok(IntakeOutcome::Merged {
                root,
                score: found.score,
            });
        }

        let complaint = self
            .repository
            .save(Complaint::new_root(text, department, reporter_user_id))
            .await?;
        info!(
            "opened complaint {} in {} for reporter {}",
            complaint.id, department, reporter_user_id
        );
        Ok(IntakeOutcome::Created { complaint })
    }
}
