//! In-memory catalog and sink.

use std::collections::{BTreeMap, HashSet};

use super::{AssignmentSink, CatalogLoader};
use crate::error::StoreError;
use crate::models::{Assignment, WorkItem, Worker};

/// Catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    work_items: Vec<WorkItem>,
    workers: Vec<Worker>,
    assigned: HashSet<String>,
}

impl MemoryCatalog {
    /// Creates a catalog.
    pub fn new(work_items: Vec<WorkItem>, workers: Vec<Worker>) -> Self {
        Self {
            work_items,
            workers,
            assigned: HashSet::new(),
        }
    }

    /// Marks work items as already assigned.
    pub fn with_assigned<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned.extend(ids.into_iter().map(Into::into));
        self
    }
}

impl CatalogLoader for MemoryCatalog {
    fn work_items(&self) -> Result<Vec<WorkItem>, StoreError> {
        Ok(self.work_items.clone())
    }

    fn workers(&self) -> Result<Vec<Worker>, StoreError> {
        Ok(self.workers.clone())
    }

    fn assigned_ids(&self) -> Result<HashSet<String>, StoreError> {
        Ok(self.assigned.clone())
    }
}

/// Assignment store held in memory, keyed by work item ID.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: BTreeMap<String, Assignment>,
    remaining_writes: Option<usize>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every insert after `writes` successful ones.
    pub fn with_write_limit(mut self, writes: usize) -> Self {
        self.remaining_writes = Some(writes);
        self
    }

    /// Lifts the write limit.
    pub fn clear_write_limit(&mut self) {
        self.remaining_writes = None;
    }

    /// Stored assignment of a work item.
    pub fn get(&self, work_item_id: &str) -> Option<&Assignment> {
        self.records.get(work_item_id)
    }

    /// Number of stored assignments.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// IDs of assigned work items.
    pub fn assigned_ids(&self) -> HashSet<String> {
        self.records.keys().cloned().collect()
    }

    /// Stored assignments, ordered by work item ID.
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.records.values()
    }
}

impl AssignmentSink for MemorySink {
    fn insert_if_absent(&mut self, assignment: &Assignment) -> Result<bool, StoreError> {
        if self.records.contains_key(&assignment.work_item_id) {
            return Ok(false);
        }
        if let Some(remaining) = self.remaining_writes.as_mut() {
            if *remaining == 0 {
                return Err(StoreError::WriteFailed {
                    work_item_id: assignment.work_item_id.clone(),
                    message: "write limit reached".to_string(),
                });
            }
            *remaining -= 1;
        }
        self.records
            .insert(assignment.work_item_id.clone(), assignment.clone());
        Ok(true)
    }
}
