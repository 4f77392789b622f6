//! Plan metrics (KPIs) and workload summaries.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total units | Sum of item sizes (cards) over assignments |
//! | Total minutes | Sum of planned durations |
//! | Workers used | Distinct workers with at least one assignment |
//! | Makespan end | Latest assignment end |
//! | Load percentage | Planned minutes / daily capacity |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::planner::PlanOutcome;
use crate::models::Worker;

/// Plan performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanKpi {
    /// Number of assignments.
    pub total_assignments: usize,
    /// Sum of item sizes (cards).
    pub total_units: u64,
    /// Sum of planned durations (minutes).
    pub total_minutes: i64,
    /// Distinct workers with at least one assignment.
    pub workers_used: usize,
    /// Earliest start.
    pub first_start: Option<NaiveDateTime>,
    /// Latest end.
    pub makespan_end: Option<NaiveDateTime>,
    /// Items left without an eligible worker.
    pub unassignable_count: usize,
    /// Items and workers rejected by screening.
    pub rejected_count: usize,
    /// Items skipped because they were already assigned.
    pub already_assigned_count: usize,
}

impl PlanKpi {
    /// Computes KPIs from a planning outcome.
    pub fn calculate(outcome: &PlanOutcome) -> Self {
        let assignments = &outcome.schedule.assignments;
        let workers_used: HashSet<&str> = assignments
            .iter()
            .map(|a| a.worker_id.as_str())
            .collect();

        Self {
            total_assignments: assignments.len(),
            total_units: assignments.iter().map(|a| u64::from(a.size)).sum(),
            total_minutes: assignments.iter().map(|a| a.duration_minutes).sum(),
            workers_used: workers_used.len(),
            first_start: outcome.schedule.first_start(),
            makespan_end: outcome.schedule.makespan_end(),
            unassignable_count: outcome.schedule.unassignable.len(),
            rejected_count: outcome.rejected.len(),
            already_assigned_count: outcome.already_assigned.len(),
        }
    }

    /// Total planned time in hours.
    pub fn total_hours(&self) -> f64 {
        self.total_minutes as f64 / 60.0
    }

    /// Average planned minutes per used worker.
    pub fn avg_minutes_per_worker(&self) -> f64 {
        if self.workers_used == 0 {
            0.0
        } else {
            self.total_minutes as f64 / self.workers_used as f64
        }
    }

    /// One-line summary for logs.
    pub fn summary_line(&self) -> String {
        format!(
            "{} assignments, {} cards, {} on {} workers, {} unassignable",
            self.total_assignments,
            self.total_units,
            format_duration(self.total_minutes),
            self.workers_used,
            self.unassignable_count
        )
    }
}

/// Load level of a worker relative to its daily capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkloadLevel {
    /// Below 50%.
    Low,
    /// 50% to below 75%.
    Medium,
    /// 75% to below 100%.
    High,
    /// 100% and above.
    Full,
}

impl WorkloadLevel {
    /// Level of a load percentage.
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            p if p >= 100 => WorkloadLevel::Full,
            p if p >= 75 => WorkloadLevel::High,
            p if p >= 50 => WorkloadLevel::Medium,
            _ => WorkloadLevel::Low,
        }
    }

    /// Level code.
    pub fn code(&self) -> &'static str {
        match self {
            WorkloadLevel::Low => "LOW",
            WorkloadLevel::Medium => "MEDIUM",
            WorkloadLevel::High => "HIGH",
            WorkloadLevel::Full => "FULL",
        }
    }
}

impl fmt::Display for WorkloadLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Workload of one worker over a whole outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSummary {
    /// Worker ID.
    pub worker_id: String,
    /// Display name.
    pub worker_name: String,
    /// Minutes assigned by this run, all stages together.
    pub assigned_minutes: i64,
    /// Assigned plus already-committed minutes.
    pub total_minutes: i64,
    /// Tasks assigned by this run.
    pub task_count: u32,
    /// Daily capacity (minutes).
    pub daily_capacity_minutes: u32,
    /// `total_minutes` as a percentage of daily capacity, truncated.
    pub load_percentage: u32,
    /// Load level.
    pub level: WorkloadLevel,
}

impl WorkloadSummary {
    /// Summaries for the workers of an outcome, in catalog order.
    ///
    /// Workers that were never eligible for a processed bucket are omitted.
    pub fn from_outcome(outcome: &PlanOutcome, workers: &[Worker]) -> Vec<Self> {
        // worker → (assigned, seeded, tasks)
        let mut totals: BTreeMap<&str, (i64, i64, u32)> = BTreeMap::new();
        for load in &outcome.worker_loads {
            let total = totals.entry(load.worker_id.as_str()).or_default();
            total.0 += load.entry.assigned_minutes();
            total.1 = total.1.max(load.entry.seeded_minutes);
            total.2 += load.entry.task_count;
        }

        let mut seen = HashSet::new();
        workers
            .iter()
            .filter(|w| seen.insert(w.id.as_str()))
            .filter_map(|worker| {
                let &(assigned, seeded, tasks) = totals.get(worker.id.as_str())?;
                let total_minutes = assigned + seeded;
                let load_percentage = load_percentage(total_minutes, worker.daily_capacity_minutes);
                Some(Self {
                    worker_id: worker.id.clone(),
                    worker_name: worker.display_name().to_string(),
                    assigned_minutes: assigned,
                    total_minutes,
                    task_count: tasks,
                    daily_capacity_minutes: worker.daily_capacity_minutes,
                    load_percentage,
                    level: WorkloadLevel::from_percentage(load_percentage),
                })
            })
            .collect()
    }

    /// Whether the worker is at or above capacity.
    pub fn is_overloaded(&self) -> bool {
        self.level == WorkloadLevel::Full
    }
}

fn load_percentage(minutes: i64, capacity: u32) -> u32 {
    if capacity == 0 || minutes <= 0 {
        return 0;
    }
    u32::try_from(minutes * 100 / i64::from(capacity)).unwrap_or(u32::MAX)
}

/// Formats minutes as "45min", "2h" or "2h 15min".
pub fn format_duration(minutes: i64) -> String {
    if minutes < 60 {
        return format!("{minutes}min");
    }
    let (hours, rest) = (minutes / 60, minutes % 60);
    if rest == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {rest}min")
    }
}
