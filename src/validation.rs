//! Input screening for planning runs.
//!
//! Checks work item and worker snapshots before scheduling. Detects:
//! - Duplicate IDs (later occurrences are dropped)
//! - Work items with size 0
//! - Work items in an unknown stage
//! - Active workers with no daily capacity
//!
//! Screening never fails a run: rejected records are excluded and reported
//! alongside the schedule. [`validate_input`] is the strict variant for
//! hosts that want to refuse a batch with any problem in it.

use crate::models::{WorkItem, Worker};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending work item or worker ID.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorKind {
    /// Two records share the same ID.
    DuplicateId,
    /// A work item has size 0.
    InvalidSize,
    /// A work item is in a stage no worker can be qualified for.
    UnknownStage,
    /// An active worker has no daily capacity.
    InvalidCapacity,
    /// A work item's duration or slot falls outside the representable range.
    DurationOutOfRange,
}

impl ValidationError {
    pub(crate) fn new(
        kind: ValidationErrorKind,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

/// Splits work items into schedulable ones and rejections.
///
/// Input order is preserved among the accepted items.
pub fn screen_work_items(items: &[WorkItem]) -> (Vec<&WorkItem>, Vec<ValidationError>) {
    let mut accepted = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for item in items {
        if !seen.insert(item.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &item.id,
                format!("Duplicate work item ID: {}", item.id),
            ));
            continue;
        }
        if item.size < 1 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSize,
                &item.id,
                format!("Work item '{}' has size 0", item.display_name()),
            ));
            continue;
        }
        if !item.stage.is_known() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownStage,
                &item.id,
                format!(
                    "Work item '{}' is in unknown stage '{}'",
                    item.display_name(),
                    item.stage
                ),
            ));
            continue;
        }
        accepted.push(item);
    }

    (accepted, errors)
}

/// Splits workers into usable ones and rejections.
///
/// Inactive workers are dropped silently: filtering by status belongs to
/// the catalog loader and is not an input error.
pub fn screen_workers(workers: &[Worker]) -> (Vec<&Worker>, Vec<ValidationError>) {
    let mut accepted = Vec::with_capacity(workers.len());
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for worker in workers {
        if !seen.insert(worker.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &worker.id,
                format!("Duplicate worker ID: {}", worker.id),
            ));
            continue;
        }
        if !worker.active {
            continue;
        }
        if worker.daily_capacity_minutes == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidCapacity,
                &worker.id,
                format!("Worker '{}' has no daily capacity", worker.display_name()),
            ));
            continue;
        }
        accepted.push(worker);
    }

    (accepted, errors)
}

/// Validates a whole planning input.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(items: &[WorkItem], workers: &[Worker]) -> ValidationResult {
    let (_, mut errors) = screen_work_items(items);
    let (_, worker_errors) = screen_workers(workers);
    errors.extend(worker_errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
