//! Work item (order) model.
//!
//! A work item is one order waiting in one processing stage. Its duration
//! is proportional to its size (number of cards).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{PriorityCode, Stage};

/// A unit of work to be scheduled.
///
/// Snapshots are produced by the catalog loader and are read-only to the
/// planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Unique, stable identifier.
    pub id: String,
    /// Human-readable label (e.g. order number). Used only for logging.
    #[serde(default)]
    pub label: String,
    /// Number of sub-units (cards). Must be at least 1.
    pub size: u32,
    /// Priority tier.
    #[serde(default)]
    pub priority: PriorityCode,
    /// Current processing stage.
    pub stage: Stage,
    /// Order date. Tie-break for equal priorities and anchor for the
    /// first slot of an idle worker.
    pub reference_date: NaiveDateTime,
}

impl WorkItem {
    /// Creates a work item with size 1 and no priority code.
    pub fn new(id: impl Into<String>, stage: Stage, reference_date: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            size: 1,
            priority: PriorityCode::default(),
            stage,
            reference_date,
        }
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the size (card count).
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Sets the priority tier.
    pub fn with_priority(mut self, priority: impl Into<PriorityCode>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Processing duration in minutes for the given rate.
    ///
    /// `None` when the product overflows.
    #[inline]
    pub fn duration_minutes(&self, minutes_per_unit: i64) -> Option<i64> {
        i64::from(self.size).checked_mul(minutes_per_unit)
    }

    /// Label if present, otherwise the id.
    pub fn display_name(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}
