//! Duplicate detection for incoming reports.
//!
//! A new report is compared against every root complaint already filed under
//! its department. The scan is linear with no early exit, so the returned
//! match is the global best, not merely the first above threshold.

use crate::complaint::Complaint;
use crate::normalize::normalize;
use crate::repository::{ComplaintRepository, RepositoryError};
use crate::similarity::jaccard;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Minimum similarity for a report to count as a restatement.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// The best-matching existing complaint and its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub complaint: Complaint,
    pub score: f64,
}

/// Find the existing root complaint this report most likely restates.
///
/// Queries the repository for root complaints of `department`, scores each
/// against `text`, and returns the maximum-scoring candidate iff its score
/// reaches `threshold`. On equal scores the candidate encountered first in
/// the repository's iteration order wins (the comparison is strictly
/// greater-than), which is why the repository contract demands a stable
/// order. Repository failures propagate verbatim.
pub async fn find_duplicate(
    repository: &dyn ComplaintRepository,
    text: &str,
    department: &str,
    threshold: f64,
) -> Result<Option<DuplicateMatch>, RepositoryError> {
    let candidates = repository.find_roots_by_department(department).await?;

    let normalized = normalize(text);
    let tokens: HashSet<&str> = normalized.split_whitespace().collect();

    let mut best_match: Option<Complaint> = None;
    let mut highest_score = 0.0f64;

    for candidate in candidates {
        // Contract guard: a misbehaving backend must not leak absorbed or
        // foreign-department records into the merge path.
        if !candidate.is_root() || candidate.department != department {
            continue;
        }

        let candidate_tokens: HashSet<&str> =
            candidate.normalized_text.split_whitespace().collect();
        let score = jaccard(&tokens, &candidate_tokens);

        if score > highest_score {
            highest_score = score;
            best_match = Some(candidate);
        }
    }

    if let Some(complaint) = best_match {
        if highest_score >= threshold {
            info!(
                "duplicate found in {}: score {:.3} against complaint {}",
                department, highest_score, complaint.id
            );
            return Ok(Some(DuplicateMatch {
                complaint,
                score: highest_score,
            }));
        }
    }

    debug!(
        "no duplicate in {} (best score {:.3} < {:.3})",
        department, highest_score, threshold
    );
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryComplaintRepository;
    use approx::assert_relative_eq;

    async fn seeded_repo() -> InMemoryComplaintRepository {
        let repo = InMemoryComplaintRepository::new();
        for (text, department, reporter) in [
            ("streetlight not working", "Electricity", "user-a"),
            ("power line broken near school", "Electricity", "user-b"),
            ("pothole in road", "Roads", "user-c"),
        ] {
            repo.save(Complaint::new_root(text, department, reporter))
                .await
                .unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_finds_best_match_above_threshold() {
        let repo = seeded_repo().await;
        let found = find_duplicate(
            &repo,
            "streetlight is not working",
            "Electricity",
            DEFAULT_SIMILARITY_THRESHOLD,
        )
        .await
        .unwrap()
        .expect("should match the streetlight complaint");

        assert_eq!(found.complaint.text, "streetlight not working");
        assert_relative_eq!(found.score, 0.75);
    }

    #[tokio::test]
    async fn test_below_threshold_is_no_match() {
        let repo = seeded_repo().await;
        let found = find_duplicate(
            &repo,
            "street light is not working",
            "Electricity",
            DEFAULT_SIMILARITY_THRESHOLD,
        )
        .await
        .unwrap();
        // Compound-word split drops the overlap to 2/6.
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_lower_threshold_accepts_looser_match() {
        let repo = seeded_repo().await;
        let found = find_duplicate(&repo, "street light is not working", "Electricity", 0.3)
            .await
            .unwrap()
            .expect("loose threshold should match");
        assert_eq!(found.complaint.text, "streetlight not working");
        assert_relative_eq!(found.score, 2.0 / 6.0);
    }

    #[tokio::test]
    async fn test_scopes_to_department() {
        let repo = seeded_repo().await;
        // Identical text, wrong department: no candidates at all.
        let found = find_duplicate(&repo, "pothole in road", "Electricity", 0.1)
            .await
            .unwrap();
        assert!(found.is_none() || found.unwrap().complaint.department == "Electricity");
    }

    #[tokio::test]
    async fn test_empty_repository_is_no_match() {
        let repo = InMemoryComplaintRepository::new();
        let found = find_duplicate(&repo, "anything at all", "Roads", 0.0)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_never_matches_absorbed_records() {
        let repo = InMemoryComplaintRepository::new();
        let root = Complaint::new_root("garbage not collected", "Sanitation", "user-a");
        let mut absorbed = Complaint::new_root("garbage not collected", "Sanitation", "user-b");
        absorbed.duplicate_of = Some(root.id);
        repo.save(root.clone()).await.unwrap();
        repo.save(absorbed).await.unwrap();

        let found = find_duplicate(&repo, "garbage not collected", "Sanitation", 0.6)
            .await
            .unwrap()
            .expect("root should match");
        assert_eq!(found.complaint.id, root.id);
        assert!(found.complaint.is_root());
    }

    #[tokio::test]
    async fn test_tie_breaks_to_first_inserted() {
        let repo = InMemoryComplaintRepository::new();
        let first = Complaint::new_root("water leakage", "Water", "user-a");
        let second = Complaint::new_root("water leakage", "Water", "user-b");
        repo.save(first.clone()).await.unwrap();
        repo.save(second).await.unwrap();

        let found = find_duplicate(&repo, "water leakage", "Water", 0.6)
            .await
            .unwrap()
            .expect("exact text should match");
        assert_eq!(found.complaint.id, first.id);
        assert_relative_eq!(found.score, 1.0);
    }

    #[tokio::test]
    async fn test_global_maximum_wins_over_earlier_weaker_match() {
        let repo = InMemoryComplaintRepository::new();
        repo.save(Complaint::new_root("drain overflow", "Water", "user-a"))
            .await
            .unwrap();
        repo.save(Complaint::new_root(
            "drain overflow near market",
            "Water",
            "user-b",
        ))
        .await
        .unwrap();

        let found = find_duplicate(&repo, "drain overflow near market", "Water", 0.6)
            .await
            .unwrap()
            .expect("should match");
        // The later, stronger candidate wins; the scan does not stop at the
        // first partial overlap.
        assert_eq!(found.complaint.text, "drain overflow near market");
        assert_relative_eq!(found.score, 1.0);
    }
}
