//! Duplicate guard.
//!
//! Holds the IDs of work items that already have an assignment when a run
//! starts. The set is read once and never refreshed during the run, so an
//! item inserted concurrently by another run is caught by the sink's
//! insert-if-absent instead.

use std::collections::HashSet;

/// Read-only set of already-assigned work item IDs.
#[derive(Debug, Clone, Default)]
pub struct DuplicateGuard {
    assigned: HashSet<String>,
}

impl DuplicateGuard {
    /// Creates a guard from a snapshot of assigned IDs.
    pub fn new<I, S>(assigned: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assigned: assigned.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether an item already has an assignment.
    #[inline]
    pub fn already_assigned(&self, work_item_id: &str) -> bool {
        self.assigned.contains(work_item_id)
    }

    /// Number of guarded IDs.
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    /// Whether the guard is empty.
    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}

impl From<HashSet<String>> for DuplicateGuard {
    fn from(assigned: HashSet<String>) -> Self {
        Self { assigned }
    }
}
