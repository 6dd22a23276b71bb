//! Built-in training corpus for the department classifier.
//!
//! Hand-curated short phrases mapped to department labels. Retraining means
//! rebuilding the classifier from an edited table (or a config file), never
//! mutating a live model.

use serde::{Deserialize, Serialize};

/// One training example: a short complaint phrase and its department label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub phrase: String,
    pub department: String,
}

impl TrainingExample {
    pub fn new(phrase: &str, department: &str) -> Self {
        Self {
            phrase: phrase.to_string(),
            department: department.to_string(),
        }
    }
}

/// Default (phrase, department) table. Add more phrases for better accuracy.
const DEFAULT_CORPUS: &[(&str, &str)] = &[
    // Electricity
    ("streetlight not working", "Electricity"),
    ("power line broken", "Electricity"),
    ("electric pole damaged", "Electricity"),
    ("no current in area", "Electricity"),
    // Roads
    ("pothole in road", "Roads"),
    ("road damaged", "Roads"),
    ("crack on road", "Roads"),
    ("asphalt broken", "Roads"),
    // Sanitation
    ("garbage not collected", "Sanitation"),
    ("trash overflow", "Sanitation"),
    ("waste dumped", "Sanitation"),
    ("bad smell from garbage", "Sanitation"),
    // Water / Drainage
    ("water leakage", "Water"),
    ("pipe burst", "Water"),
    ("drain overflow", "Water"),
    ("water stagnation", "Water"),
    // Fire
    ("fire accident", "Fire"),
    ("smoke in building", "Fire"),
];

/// The default corpus as owned training examples.
pub fn default_corpus() -> Vec<TrainingExample> {
    DEFAULT_CORPUS
        .iter()
        .map(|(phrase, department)| TrainingExample::new(phrase, department))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_corpus_covers_five_departments() {
        let corpus = default_corpus();
        let mut departments: Vec<&str> =
            corpus.iter().map(|e| e.department.as_str()).collect();
        departments.sort();
        departments.dedup();
        assert_eq!(
            departments,
            vec!["Electricity", "Fire", "Roads", "Sanitation", "Water"]
        );
    }

    #[test]
    fn test_phrases_are_nonempty() {
        for example in default_corpus() {
            assert!(!example.phrase.trim().is_empty());
        }
    }
}
