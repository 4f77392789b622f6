//! Error types.
//!
//! Only run-level failures are errors. Per-item problems (invalid items,
//! items without an eligible worker) are reported as data in the plan
//! outcome so one bad item never aborts a batch.

use chrono::NaiveTime;
use thiserror::Error;

/// Run-level planning failures. Raised before any item is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanningError {
    /// The working day closes at or before it opens.
    #[error("policy misconfiguration: work day end {end} is not after start {start}")]
    InvalidWorkDay {
        /// Configured opening time.
        start: NaiveTime,
        /// Configured closing time.
        end: NaiveTime,
    },
    /// `minutes_per_unit` must be positive.
    #[error("policy misconfiguration: minutes_per_unit must be positive, got {0}")]
    NonPositiveMinutesPerUnit(i64),
    /// `minutes_per_unit` exceeds the supported maximum.
    #[error("policy misconfiguration: minutes_per_unit {value} is above the maximum {max}")]
    MinutesPerUnitTooLarge {
        /// Configured rate.
        value: i64,
        /// Largest accepted rate.
        max: i64,
    },
    /// The inter-task gap must not be negative.
    #[error("policy misconfiguration: inter_task_gap_minutes must not be negative, got {0}")]
    NegativeGap(i64),
    /// The inter-task gap is longer than the working day.
    #[error("policy misconfiguration: gap of {gap} min exceeds the {day_length} min work day")]
    GapLongerThanDay {
        /// Configured gap.
        gap: i64,
        /// Length of the working day in minutes.
        day_length: i64,
    },
    /// A policy source could not be read.
    #[error("policy misconfiguration: {0}")]
    InvalidSource(String),
}

/// Failures reported by catalog loaders and assignment sinks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// A record could not be written.
    #[error("write failed for work item {work_item_id}: {message}")]
    WriteFailed {
        /// Work item whose assignment failed to persist.
        work_item_id: String,
        /// Backend message.
        message: String,
    },
}

/// Result alias for planning entry points.
pub type PlanningResult<T> = Result<T, PlanningError>;
