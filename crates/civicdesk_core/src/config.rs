//! Civicdesk core configuration.
//!
//! Thresholds, the training corpus and the label tables are data, not code:
//! deployments tune them in a TOML file and rebuild the model objects at
//! startup. Every field has a compiled-in default, so a missing file or a
//! partial file both work.

use crate::classifier::{DepartmentClassifier, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_SMOOTHING};
use crate::corpus::{default_corpus, TrainingExample};
use crate::dedup::DEFAULT_SIMILARITY_THRESHOLD;
use crate::labels::{
    default_label_rules, LabelDepartmentScorer, LabelFilter, LabelRule, BLOCKED_CATEGORIES,
    STOP_LABELS,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Text classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Minimum top posterior to report a concrete department.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,

    /// Additive smoothing constant for unseen tokens.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,

    /// Training corpus; replacing it means retraining at startup.
    #[serde(default = "default_corpus")]
    pub corpus: Vec<TrainingExample>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            smoothing: DEFAULT_SMOOTHING,
            corpus: default_corpus(),
        }
    }
}

/// Duplicate detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Minimum Jaccard similarity for a report to merge into an open
    /// complaint.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Label scoring and upstream-filter tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelConfig {
    #[serde(default = "default_stop_labels")]
    pub stop_labels: Vec<String>,

    #[serde(default = "default_blocked_categories")]
    pub blocked_categories: Vec<String>,

    #[serde(default = "default_label_rules")]
    pub rules: Vec<LabelRule>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            stop_labels: default_stop_labels(),
            blocked_categories: default_blocked_categories(),
            rules: default_label_rules(),
        }
    }
}

/// Top-level configuration for the intake core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub dedup: DedupConfig,

    #[serde(default)]
    pub labels: LabelConfig,
}

impl CoreConfig {
    /// Load configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Train the department classifier described by this config.
    pub fn build_classifier(&self) -> DepartmentClassifier {
        DepartmentClassifier::train(
            &self.classifier.corpus,
            self.classifier.smoothing,
            self.classifier.confidence_threshold,
        )
    }

    /// Build the label scorer described by this config.
    pub fn build_label_scorer(&self) -> LabelDepartmentScorer {
        LabelDepartmentScorer::with_rules(self.labels.rules.clone())
    }

    /// Build the upstream label filter described by this config.
    pub fn build_label_filter(&self) -> LabelFilter {
        LabelFilter::with_tables(
            self.labels.stop_labels.clone(),
            self.labels.blocked_categories.clone(),
        )
    }
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_smoothing() -> f64 {
    DEFAULT_SMOOTHING
}

fn default_similarity_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_stop_labels() -> Vec<String> {
    STOP_LABELS.iter().map(|l| l.to_string()).collect()
}

fn default_blocked_categories() -> Vec<String> {
    BLOCKED_CATEGORIES.iter().map(|c| c.to_string()).collect()
}
