//! Complaint records and the duplicate-merge policy.

use crate::normalize::normalize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A citizen-reported civic issue.
///
/// `text`, `normalized_text`, `department` and `created_at` are fixed at
/// creation. The only sanctioned mutation afterwards is [`absorb_report`],
/// which folds a duplicate report into a root record.
///
/// [`absorb_report`]: Complaint::absorb_report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    /// Unique id, assigned at creation.
    pub id: Uuid,
    /// Original free-form description (possibly a transcript).
    pub text: String,
    /// Cached canonical token form of `text`, computed once.
    pub normalized_text: String,
    /// Assigned department label.
    pub department: String,
    /// `None` for a root (canonical) record; `Some(root_id)` once absorbed.
    /// Never cleared after being set.
    pub duplicate_of: Option<Uuid>,
    /// Reports folded into this record, the original included. Only
    /// meaningful on roots.
    pub duplicate_count: u32,
    /// Reporters associated with this record, set semantics, insertion order.
    pub reporter_user_ids: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Complaint {
    /// Open a new root complaint for a first-sighted report.
    pub fn new_root(text: &str, department: &str, reporter_user_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.to_string(),
            normalized_text: normalize(text),
            department: department.to_string(),
            duplicate_of: None,
            duplicate_count: 1,
            reporter_user_ids: vec![reporter_user_id.to_string()],
            created_at: Utc::now(),
        }
    }

    /// Whether this record is canonical (not absorbed into another).
    pub fn is_root(&self) -> bool {
        self.duplicate_of.is_none()
    }

    /// Fold one duplicate report into this root.
    ///
    /// Bumps the duplicate count and records the reporter; re-adding a
    /// reporter who already filed is a no-op on the reporter set. Text,
    /// normalized text and department stay untouched.
    pub fn absorb_report(&mut self, reporter_user_id: &str) {
        self.duplicate_count += 1;
        if !self
            .reporter_user_ids
            .iter()
            .any(|existing| existing == reporter_user_id)
        {
            self.reporter_user_ids.push(reporter_user_id.to_string());
        }
    }
}
