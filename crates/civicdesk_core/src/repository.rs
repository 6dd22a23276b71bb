//! Complaint storage abstraction.
//!
//! The core never owns persistence. Production deployments implement
//! [`ComplaintRepository`] over their document store; tests and embedders use
//! the in-memory implementation, which doubles as the reference for the
//! iteration-order contract.

use crate::complaint::Complaint;
use async_trait::async_trait;
use std::sync::Mutex;
use uuid::Uuid;

/// Storage failures, propagated verbatim to the caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RepositoryError {
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A concurrent write lost the per-record atomicity race. Backends with
    /// compare-and-swap updates surface retry exhaustion here.
    #[error("conflicting write on complaint {0}")]
    Conflict(Uuid),
}

// ============================================================================
// Repository Trait
// ============================================================================

/// Abstract complaint store.
///
/// Contract:
/// - `find_roots_by_department` returns only root records (`duplicate_of`
///   unset) of exactly that department, in a stable, documented iteration
///   order; duplicate search tie-breaks depend on it.
/// - `save` creates or updates a single record atomically; concurrent merges
///   on one root must not lose updates.
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// All root complaints currently filed under a department.
    async fn find_roots_by_department(
        &self,
        department: &str,
    ) -> Result<Vec<Complaint>, RepositoryError>;

    /// Create or update one record. Returns the record as persisted.
    async fn save(&self, complaint: Complaint) -> Result<Complaint, RepositoryError>;

    /// Fetch one record by id.
    async fn get(&self, id: &Uuid) -> Result<Option<Complaint>, RepositoryError>;
}

// ============================================================================
// In-Memory Implementation
// ============================================================================

/// In-memory repository with insertion-order iteration.
///
/// The reference implementation of the trait contract and the fake used by
/// the pipeline tests. Call counters let tests assert how often the pipeline
/// touched storage.
#[derive(Default)]
pub struct InMemoryComplaintRepository {
    records: Mutex<Vec<Complaint>>,
    query_count: Mutex<usize>,
    save_count: Mutex<usize>,
}

impl InMemoryComplaintRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records (roots and duplicates).
    pub fn record_count(&self) -> usize {
        self.records.lock().expect("repository lock poisoned").len()
    }

    /// How many department queries have run.
    pub fn query_count(&self) -> usize {
        *self.query_count.lock().expect("repository lock poisoned")
    }

    /// How many saves have run.
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().expect("repository lock poisoned")
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryComplaintRepository {
    async fn find_roots_by_department(
        &self,
        department: &str,
    ) -> Result<Vec<Complaint>, RepositoryError> {
        *self.query_count.lock().expect("repository lock poisoned") += 1;
        let records = self.records.lock().expect("repository lock poisoned");
        Ok(records
            .iter()
            .filter(|c| c.is_root() && c.department == department)
            .cloned()
            .collect())
    }

    async fn save(&self, complaint: Complaint) -> Result<Complaint, RepositoryError> {
        *self.save_count.lock().expect("repository lock poisoned") += 1;
        let mut records = self.records.lock().expect("repository lock poisoned");
        match records.iter().position(|c| c.id == complaint.id) {
            // Update in place: keeps the record's position in iteration order.
            Some(slot) => records[slot] = complaint.clone(),
            None => records.push(complaint.clone()),
        }
        Ok(complaint)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Complaint>, RepositoryError> {
        let records = self.records.lock().expect("repository lock poisoned");
        Ok(records.iter().find(|c| &c.id == id).cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================
