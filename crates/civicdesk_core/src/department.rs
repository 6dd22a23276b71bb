//! Civic departments a complaint can be routed to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The departments complaints are routed to.
///
/// `Unknown` is a valid routing outcome, not an error: it means neither the
/// text classifier nor the label scorer found enough signal, and the caller
/// should send the report to manual triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Roads,
    Water,
    Electricity,
    Sanitation,
    Fire,
    Unknown,
}

impl Department {
    /// Tie-break order for the label scorer: accumulators are compared in
    /// this order and the first strictly-highest wins.
    pub const LABEL_PRIORITY: [Department; 5] = [
        Department::Roads,
        Department::Water,
        Department::Electricity,
        Department::Sanitation,
        Department::Fire,
    ];

    /// Canonical short label, as used by the text classifier corpus.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roads => "Roads",
            Self::Water => "Water",
            Self::Electricity => "Electricity",
            Self::Sanitation => "Sanitation",
            Self::Fire => "Fire",
            Self::Unknown => "Unknown",
        }
    }

    /// Full civic display name, as used by the label-scoring path.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Roads => "Roads / Public Works",
            Self::Water => "Water / Drainage",
            Self::Electricity => "Electricity / Streetlight",
            Self::Sanitation => "Sanitation",
            Self::Fire => "Fire & Emergency",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse either the short label or the display name.
    pub fn from_label(label: &str) -> Option<Department> {
        let all = [
            Self::Roads,
            Self::Water,
            Self::Electricity,
            Self::Sanitation,
            Self::Fire,
            Self::Unknown,
        ];
        all.into_iter()
            .find(|d| d.as_str() == label || d.display_name() == label)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(Department::Fire.to_string(), "Fire & Emergency");
        assert_eq!(Department::Roads.display_name(), "Roads / Public Works");
        assert_eq!(Department::Sanitation.display_name(), "Sanitation");
    }

    #[test]
    fn test_from_label_both_spellings() {
        assert_eq!(Department::from_label("Water"), Some(Department::Water));
        assert_eq!(
            Department::from_label("Water / Drainage"),
            Some(Department::Water)
        );
        assert_eq!(Department::from_label("Parks"), None);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(Department::LABEL_PRIORITY[0], Department::Roads);
        assert_eq!(Department::LABEL_PRIORITY[4], Department::Fire);
    }
}
