//! Schedule (solution) model.
//!
//! A schedule is the list of work item → worker × time slot assignments
//! produced by one planning run, plus the items that could not be placed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{PriorityCode, Stage, TimeWindow};

/// The result of one planning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Assignments in emission order.
    pub assignments: Vec<Assignment>,
    /// Items that could not be assigned.
    pub unassignable: Vec<Unassignable>,
}

/// A work item placed on a worker during a time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned work item ID.
    pub work_item_id: String,
    /// Assigned worker ID.
    pub worker_id: String,
    /// Start timestamp.
    pub start: NaiveDateTime,
    /// End timestamp.
    pub end: NaiveDateTime,
    /// Planned duration (minutes).
    pub duration_minutes: i64,
    /// Item size (cards), denormalized for statistics.
    pub size: u32,
    /// Item priority tier.
    pub priority: PriorityCode,
    /// Stage the assignment was planned for.
    pub stage: Stage,
}

/// A work item that stayed unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unassignable {
    /// Work item ID.
    pub work_item_id: String,
    /// Stage bucket the item belonged to.
    pub stage: Stage,
    /// Why no assignment was made.
    pub reason: UnassignableReason,
}

/// Reason codes for unassignable items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnassignableReason {
    /// No active worker holds the capability for the item's stage.
    NoEligibleWorker,
}

impl UnassignableReason {
    /// Reason code.
    pub fn code(&self) -> &'static str {
        match self {
            UnassignableReason::NoEligibleWorker => "NO_ELIGIBLE_WORKER",
        }
    }
}

impl fmt::Display for UnassignableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Assignment {
    /// Occupied interval.
    #[inline]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start, self.end)
    }
}

impl Unassignable {
    /// Creates a no-eligible-worker record.
    pub fn no_eligible_worker(work_item_id: impl Into<String>, stage: Stage) -> Self {
        Self {
            work_item_id: work_item_id.into(),
            stage,
            reason: UnassignableReason::NoEligibleWorker,
        }
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Records an unassignable item.
    pub fn add_unassignable(&mut self, unassignable: Unassignable) {
        self.unassignable.push(unassignable);
    }

    /// Appends another schedule (used to merge stage buckets).
    pub fn extend(&mut self, other: Schedule) {
        self.assignments.extend(other.assignments);
        self.unassignable.extend(other.unassignable);
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether every item got an assignment.
    pub fn is_complete(&self) -> bool {
        self.unassignable.is_empty()
    }

    /// Latest end across all assignments.
    pub fn makespan_end(&self) -> Option<NaiveDateTime> {
        self.assignments.iter().map(|a| a.end).max()
    }

    /// Earliest start across all assignments.
    pub fn first_start(&self) -> Option<NaiveDateTime> {
        self.assignments.iter().map(|a| a.start).min()
    }

    /// Finds the assignment for a work item.
    pub fn assignment_for_item(&self, work_item_id: &str) -> Option<&Assignment> {
        self.assignments
            .iter()
            .find(|a| a.work_item_id == work_item_id)
    }

    /// Returns all assignments of a worker, in emission order.
    pub fn assignments_for_worker(&self, worker_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .collect()
    }

    /// Total planned minutes of a worker.
    pub fn worker_minutes(&self, worker_id: &str) -> i64 {
        self.assignments_for_worker(worker_id)
            .iter()
            .map(|a| a.duration_minutes)
            .sum()
    }

    /// Total planned minutes per worker.
    pub fn minutes_by_worker(&self) -> HashMap<String, i64> {
        let mut minutes: HashMap<String, i64> = HashMap::new();
        for a in &self.assignments {
            *minutes.entry(a.worker_id.clone()).or_insert(0) += a.duration_minutes;
        }
        minutes
    }

    /// Finds a pair of overlapping assignments on the same worker.
    ///
    /// Returns the work item IDs of the first conflicting pair found.
    pub fn find_overlap(&self) -> Option<(&str, &str)> {
        let mut by_worker: HashMap<&str, Vec<&Assignment>> = HashMap::new();
        for a in &self.assignments {
            by_worker.entry(a.worker_id.as_str()).or_default().push(a);
        }

        for list in by_worker.values_mut() {
            list.sort_by_key(|a| (a.start, a.end));
            for pair in list.windows(2) {
                if pair[0].window().overlaps(&pair[1].window()) {
                    return Some((&pair[0].work_item_id, &pair[1].work_item_id));
                }
            }
        }
        None
    }
}
