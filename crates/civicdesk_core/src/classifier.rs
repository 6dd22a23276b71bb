//! Department Classifier v0.4.0
//!
//! Multinomial naive-Bayes text classifier over the complaint corpus:
//! - trained once at construction, immutable afterwards
//! - bag-of-words with add-one (Laplace) smoothing
//! - posteriors normalized to sum to 1, so the confidence threshold
//!   compares against a real probability
//! - below-threshold top class reports the department as Unknown while the
//!   ranking and confidence stay truthful
//!
//! Inference is `&self` and safe to share across threads.

use crate::corpus::{default_corpus, TrainingExample};
use crate::department::Department;
use crate::normalize::normalize;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Minimum top-class posterior to report a concrete department.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.4;

/// Add-one smoothing constant.
pub const DEFAULT_SMOOTHING: f64 = 1.0;

// ============================================================================
// Classification Result
// ============================================================================

/// One entry in the ranked classifier output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedDepartment {
    pub department: String,
    pub score: f64,
}

/// Full classification result.
///
/// `department` is `"Unknown"` when the top posterior falls below the
/// threshold; `confidence` and `ranked` always describe the true top class,
/// so callers that want the raw winner can read `ranked[0]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub department: String,
    pub confidence: f64,
    pub ranked: Vec<RankedDepartment>,
}

// ============================================================================
// Trained Model
// ============================================================================

#[derive(Debug, Clone)]
struct ClassStats {
    label: String,
    document_count: u32,
    token_counts: HashMap<String, u32>,
    total_tokens: u32,
}

/// Trained department classifier.
///
/// Construct once during process initialization and pass by reference to
/// whatever performs inference; there is no global model state.
#[derive(Debug, Clone)]
pub struct DepartmentClassifier {
    classes: Vec<ClassStats>,
    vocabulary: HashSet<String>,
    total_documents: u32,
    smoothing: f64,
    confidence_threshold: f64,
}

impl DepartmentClassifier {
    /// Train a model from the built-in corpus with default thresholds.
    pub fn with_default_corpus() -> Self {
        Self::train(
            &default_corpus(),
            DEFAULT_SMOOTHING,
            DEFAULT_CONFIDENCE_THRESHOLD,
        )
    }

    /// Train a model from a corpus of (phrase, department) examples.
    ///
    /// Class order follows first appearance in the corpus; ranking ties
    /// preserve that order.
    pub fn train(corpus: &[TrainingExample], smoothing: f64, confidence_threshold: f64) -> Self {
        let mut classes: Vec<ClassStats> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut vocabulary: HashSet<String> = HashSet::new();
        let mut total_documents = 0u32;

        for example in corpus {
            let tokens: Vec<String> = normalize(&example.phrase)
                .split_whitespace()
                .map(str::to_string)
                .collect();
            if tokens.is_empty() {
                continue;
            }

            let slot = *index.entry(example.department.clone()).or_insert_with(|| {
                classes.push(ClassStats {
                    label: example.department.clone(),
                    document_count: 0,
                    token_counts: HashMap::new(),
                    total_tokens: 0,
                });
                classes.len() - 1
            });

            let stats = &mut classes[slot];
            stats.document_count += 1;
            total_documents += 1;
            for token in tokens {
                vocabulary.insert(token.clone());
                *stats.token_counts.entry(token).or_insert(0) += 1;
                stats.total_tokens += 1;
            }
        }

        info!(
            "trained department classifier: {} classes, {} documents, {} vocabulary terms",
            classes.len(),
            total_documents,
            vocabulary.len()
        );

        Self {
            classes,
            vocabulary,
            total_documents,
            smoothing,
            confidence_threshold,
        }
    }

    /// Classify free text into a department.
    ///
    /// Case-insensitive and whitespace-trimmed; tokenization goes through the
    /// same normalization as the dedup path. Deterministic for a fixed corpus.
    pub fn classify(&self, text: &str) -> Classification {
        if self.classes.is_empty() || self.total_documents == 0 {
            return Classification {
                department: Department::Unknown.as_str().to_string(),
                confidence: 0.0,
                ranked: Vec::new(),
            };
        }

        let normalized = normalize(text.trim());
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let vocab_size = self.vocabulary.len() as f64;

        // Log-space class scores: log prior + sum of log likelihoods.
        let mut log_scores: Vec<(usize, f64)> = Vec::with_capacity(self.classes.len());
        for (slot, stats) in self.classes.iter().enumerate() {
            let mut score =
                (stats.document_count as f64 / self.total_documents as f64).ln();
            let denominator = stats.total_tokens as f64 + self.smoothing * vocab_size;
            for token in &tokens {
                let count = stats.token_counts.get(*token).copied().unwrap_or(0);
                score += ((count as f64 + self.smoothing) / denominator).ln();
            }
            log_scores.push((slot, score));
        }

        // Normalize to posteriors via log-sum-exp.
        let max_score = log_scores
            .iter()
            .map(|(_, s)| *s)
            .fold(f64::NEG_INFINITY, f64::max);
        let denom: f64 = log_scores.iter().map(|(_, s)| (s - max_score).exp()).sum();

        let mut ranked: Vec<RankedDepartment> = log_scores
            .into_iter()
            .map(|(slot, s)| RankedDepartment {
                department: self.classes[slot].label.clone(),
                score: (s - max_score).exp() / denom,
            })
            .collect();
        // Stable sort: ties keep corpus order.
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        let top = &ranked[0];
        let confidence = top.score;
        let department = if confidence < self.confidence_threshold {
            debug!(
                "classification below threshold ({:.3} < {:.3}), reporting Unknown",
                confidence, self.confidence_threshold
            );
            Department::Unknown.as_str().to_string()
        } else {
            top.department.clone()
        };

        Classification {
            department,
            confidence,
            ranked,
        }
    }

    /// The confidence threshold this model was built with.
    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> DepartmentClassifier {
        DepartmentClassifier::with_default_corpus()
    }

    #[test]
    fn test_pothole_routes_to_roads() {
        let result = model().classify("pothole in road");
        assert_eq!(result.department, "Roads");
        assert!(result.confidence >= DEFAULT_CONFIDENCE_THRESHOLD);
        assert_eq!(result.ranked[0].department, "Roads");
    }

    #[test]
    fn test_streetlight_routes_to_electricity() {
        let result = model().classify("streetlight not working");
        assert_eq!(result.department, "Electricity");
        assert!(result.confidence >= DEFAULT_CONFIDENCE_THRESHOLD);
    }

    #[test]
    fn test_garbage_routes_to_sanitation() {
        let result = model().classify("garbage overflow near market");
        assert_eq!(result.department, "Sanitation");
    }

    #[test]
    fn test_empty_text_is_unknown() {
        let result = model().classify("");
        assert_eq!(result.department, "Unknown");
        assert!(result.confidence < DEFAULT_CONFIDENCE_THRESHOLD);
        // Ranking still carries the prior-only ordering.
        assert_eq!(result.ranked.len(), 5);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let lower = model().classify("pothole in road");
        let shouty = model().classify("  POTHOLE, IN ROAD!! ");
        assert_eq!(lower.department, shouty.department);
        assert_relative_eq!(lower.confidence, shouty.confidence);
    }

    #[test]
    fn test_posteriors_sum_to_one() {
        let result = model().classify("water leakage in street");
        let total: f64 = result.ranked.iter().map(|r| r.score).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_still_reports_true_top_class() {
        // Off-corpus text: no token matches anything trained.
        let result = model().classify("xyzzy plugh");
        assert_eq!(result.department, "Unknown");
        assert!(!result.ranked.is_empty());
        assert!(result.ranked[0].score >= result.ranked[result.ranked.len() - 1].score);
        assert_relative_eq!(result.confidence, result.ranked[0].score);
    }

    #[test]
    fn test_empty_corpus_degrades_to_unknown() {
        let empty = DepartmentClassifier::train(&[], 1.0, 0.4);
        let result = empty.classify("pothole in road");
        assert_eq!(result.department, "Unknown");
        assert!(result.ranked.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let a = model().classify("drain overflow near school");
        let b = model().classify("drain overflow near school");
        assert_eq!(a.department, b.department);
        assert_relative_eq!(a.confidence, b.confidence);
    }

    #[test]
    fn test_custom_threshold_changes_reported_department() {
        let corpus = default_corpus();
        let strict = DepartmentClassifier::train(&corpus, 1.0, 0.99);
        let result = strict.classify("pothole in road");
        assert_eq!(result.department, "Unknown");
        assert_eq!(result.ranked[0].department, "Roads");
    }
}
