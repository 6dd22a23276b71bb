//! Department scoring for image-derived labels.
//!
//! The image collaborator detects labels, filters out blocked categories and
//! generic noise (see [`LabelFilter`]), then hands the useful label names to
//! [`LabelDepartmentScorer`]. The scorer itself never filters.

use crate::department::Department;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

// ============================================================================
// Keyword / Weight Tables
// ============================================================================

/// One scoring rule: labels in `labels` add `weight` to `department`.
///
/// Weights are hand-tuned for specificity: a generic surface label says less
/// than a defect label, and fire evidence outweighs everything because a
/// missed fire costs the most.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelRule {
    pub department: Department,
    pub labels: Vec<String>,
    pub weight: u32,
}

impl LabelRule {
    fn new(department: Department, labels: &[&str], weight: u32) -> Self {
        Self {
            department,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            weight,
        }
    }
}

/// Default scoring rules.
pub fn default_label_rules() -> Vec<LabelRule> {
    vec![
        LabelRule::new(
            Department::Roads,
            &["Road", "Tarmac", "Asphalt", "Concrete", "Construction"],
            2,
        ),
        LabelRule::new(Department::Roads, &["Hole", "Pothole", "Crack", "Damage"], 4),
        LabelRule::new(
            Department::Water,
            &["Water", "Flood", "Leak", "Pipe", "Drain", "Sewage", "Puddle"],
            2,
        ),
        LabelRule::new(
            Department::Electricity,
            &[
                "Street Light",
                "Lamp",
                "Light",
                "Utility Pole",
                "Power Line",
                "Electricity",
                "Wire",
                "Cable",
            ],
            3,
        ),
        LabelRule::new(
            Department::Sanitation,
            &["Garbage", "Trash", "Waste", "Dump", "Litter", "Rubbish"],
            3,
        ),
        LabelRule::new(Department::Fire, &["Fire", "Smoke", "Flame", "Explosion"], 5),
    ]
}

// ============================================================================
// Scorer
// ============================================================================

/// Maps a list of (already filtered) label names to a department.
pub struct LabelDepartmentScorer {
    rules: Vec<LabelRule>,
}

impl LabelDepartmentScorer {
    pub fn new() -> Self {
        Self {
            rules: default_label_rules(),
        }
    }

    pub fn with_rules(rules: Vec<LabelRule>) -> Self {
        Self { rules }
    }

    /// Tally label weights per department and pick the winner.
    ///
    /// Comparison runs in [`Department::LABEL_PRIORITY`] order and only a
    /// strictly higher tally displaces the current winner, so ties go to the
    /// earlier department. An all-zero tally means no label matched any
    /// keyword and the result is `Unknown`.
    pub fn score(&self, labels: &[String]) -> Department {
        let mut tallies: HashMap<Department, u32> = HashMap::new();

        for label in labels {
            for rule in &self.rules {
                if rule.labels.iter().any(|keyword| keyword == label) {
                    *tallies.entry(rule.department).or_insert(0) += rule.weight;
                }
            }
        }

        let mut winner = Department::Unknown;
        let mut best = 0u32;
        for department in Department::LABEL_PRIORITY {
            let tally = tallies.get(&department).copied().unwrap_or(0);
            if tally > best {
                best = tally;
                winner = department;
            }
        }

        debug!("label tally {:?} -> {}", tallies, winner.as_str());
        winner
    }
}

impl Default for LabelDepartmentScorer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Upstream Filter
// ============================================================================

/// Generic labels that carry no civic signal.
pub const STOP_LABELS: &[&str] = &[
    "Animal", "Bird", "Fish", "Sea Life", "Shark", "Sky", "Cloud", "Outdoors", "Nature",
    "Plant", "Tree",
];

/// Label categories dropped wholesale before scoring.
pub const BLOCKED_CATEGORIES: &[&str] = &["Animals and Pets"];

/// A detected label with the categories its detector assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLabel {
    pub name: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl RawLabel {
    pub fn new(name: &str, categories: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Stop-label and blocked-category filtering for the image collaborator.
///
/// This runs upstream of the scorer: callers filter, then score. The tables
/// are configuration so deployments can tune noise without a rebuild.
pub struct LabelFilter {
    stop_labels: HashSet<String>,
    blocked_categories: HashSet<String>,
}

impl LabelFilter {
    pub fn new() -> Self {
        Self::with_tables(
            STOP_LABELS.iter().map(|l| l.to_string()).collect(),
            BLOCKED_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        )
    }

    pub fn with_tables(stop_labels: Vec<String>, blocked_categories: Vec<String>) -> Self {
        Self {
            stop_labels: stop_labels.into_iter().collect(),
            blocked_categories: blocked_categories.into_iter().collect(),
        }
    }

    /// The useful label names, in detection order.
    ///
    /// Drops labels belonging to any blocked category, then drops stop
    /// labels. The caller keeps the raw list for audit.
    pub fn useful_labels(&self, raw: &[RawLabel]) -> Vec<String> {
        raw.iter()
            .filter(|label| {
                !label
                    .categories
                    .iter()
                    .any(|category| self.blocked_categories.contains(category))
            })
            .filter(|label| !self.stop_labels.contains(&label.name))
            .map(|label| label.name.clone())
            .collect()
    }
}

impl Default for LabelFilter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
