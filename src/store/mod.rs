//! Collaborator seams: catalog loading and assignment persistence.
//!
//! The planner never performs I/O. Hosts load catalogs through a
//! [`CatalogLoader`], plan, then write the schedule through an
//! [`AssignmentSink`]. Writes are insert-if-absent keyed by work item, so
//! re-running a partially persisted plan never duplicates an assignment.

mod memory;

pub use memory::{MemoryCatalog, MemorySink};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{Assignment, Schedule, WorkItem, Worker};
use crate::scheduler::ScheduleRequest;

/// Source of the catalogs of a planning run.
pub trait CatalogLoader {
    /// Pending work items.
    fn work_items(&self) -> Result<Vec<WorkItem>, StoreError>;

    /// Worker catalog.
    fn workers(&self) -> Result<Vec<Worker>, StoreError>;

    /// IDs of work items that already have an assignment.
    fn assigned_ids(&self) -> Result<HashSet<String>, StoreError>;

    /// Loads everything into a request.
    fn load_request(&self) -> Result<ScheduleRequest, StoreError> {
        let request = ScheduleRequest::new(self.work_items()?, self.workers()?)
            .with_already_assigned(self.assigned_ids()?);
        debug!(
            items = request.work_items.len(),
            workers = request.workers.len(),
            assigned = request.already_assigned.len(),
            "catalog loaded"
        );
        Ok(request)
    }
}

/// Destination of planned assignments.
pub trait AssignmentSink {
    /// Stores an assignment unless one exists for the same work item.
    ///
    /// Returns `true` when the assignment was inserted.
    fn insert_if_absent(&mut self, assignment: &Assignment) -> Result<bool, StoreError>;
}

/// Result of committing a schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    /// Assignments written.
    pub inserted: usize,
    /// Assignments skipped because the item was already assigned.
    pub already_present: usize,
}

/// Writes every assignment of a schedule to a sink.
///
/// Stops at the first failed write; assignments written before it stay
/// written. Committing the same schedule again only inserts what is
/// missing.
pub fn commit<S>(schedule: &Schedule, sink: &mut S) -> Result<CommitReport, StoreError>
where
    S: AssignmentSink + ?Sized,
{
    let mut report = CommitReport::default();
    for assignment in &schedule.assignments {
        if sink.insert_if_absent(assignment)? {
            report.inserted += 1;
        } else {
            debug!(item = %assignment.work_item_id, "assignment already present");
            report.already_present += 1;
        }
    }
    info!(
        inserted = report.inserted,
        already_present = report.already_present,
        "schedule committed"
    );
    Ok(report)
}
