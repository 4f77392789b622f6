//! Planning policy configuration.
//!
//! Policy constants are validated before a run starts. A misconfigured
//! policy would corrupt every computed slot, so it aborts the run.
//!
//! # Sources
//!
//! - Builder setters on [`PlanningPolicy`]
//! - JSON via [`PlanningPolicy::from_json_str`] (missing fields take defaults)
//! - Environment overrides via [`PlanningPolicy::apply_env_overrides`]
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `PLANNING_MINUTES_PER_UNIT` | `minutes_per_unit` | integer |
//! | `PLANNING_TASK_BREAK_MINUTES` | `inter_task_gap_minutes` | integer |
//! | `PLANNING_WORK_DAY_START` | `work_day_start` | `HH:MM` |
//! | `PLANNING_WORK_DAY_END` | `work_day_end` | `HH:MM` |

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{PlanningError, PlanningResult};
use crate::models::WorkCalendar;

/// Default minutes per card.
pub const DEFAULT_MINUTES_PER_UNIT: i64 = 3;
/// Default break between two tasks of the same worker.
pub const DEFAULT_INTER_TASK_GAP_MINUTES: i64 = 5;
/// Largest accepted `minutes_per_unit` (one full day per card).
pub const MAX_MINUTES_PER_UNIT: i64 = 24 * 60;

/// Environment variable overriding `minutes_per_unit`.
pub const ENV_MINUTES_PER_UNIT: &str = "PLANNING_MINUTES_PER_UNIT";
/// Environment variable overriding `inter_task_gap_minutes`.
pub const ENV_TASK_BREAK_MINUTES: &str = "PLANNING_TASK_BREAK_MINUTES";
/// Environment variable overriding `work_day_start`.
pub const ENV_WORK_DAY_START: &str = "PLANNING_WORK_DAY_START";
/// Environment variable overriding `work_day_end`.
pub const ENV_WORK_DAY_END: &str = "PLANNING_WORK_DAY_END";

/// How workload ledgers are scoped across stage buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerScope {
    /// A fresh ledger per stage bucket. Buckets are independent.
    #[default]
    PerStage,
    /// One ledger carried through the buckets in stage order, so a worker
    /// holding several roles is never booked twice at the same time.
    Shared,
}

/// Policy constants of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningPolicy {
    /// Minutes of work per unit (card).
    pub minutes_per_unit: i64,
    /// Break inserted between two consecutive tasks of a worker (minutes).
    pub inter_task_gap_minutes: i64,
    /// Opening time of the working day.
    pub work_day_start: NaiveTime,
    /// Closing time of the working day.
    pub work_day_end: NaiveTime,
    /// Ledger scoping across stage buckets.
    pub ledger_scope: LedgerScope,
}

impl Default for PlanningPolicy {
    fn default() -> Self {
        let calendar = WorkCalendar::default();
        Self {
            minutes_per_unit: DEFAULT_MINUTES_PER_UNIT,
            inter_task_gap_minutes: DEFAULT_INTER_TASK_GAP_MINUTES,
            work_day_start: calendar.day_start,
            work_day_end: calendar.day_end,
            ledger_scope: LedgerScope::PerStage,
        }
    }
}

impl PlanningPolicy {
    /// Creates the default policy (3 min/card, 5 min gap, 09:00–17:00).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets minutes per unit.
    pub fn with_minutes_per_unit(mut self, minutes: i64) -> Self {
        self.minutes_per_unit = minutes;
        self
    }

    /// Sets the inter-task gap.
    pub fn with_gap_minutes(mut self, minutes: i64) -> Self {
        self.inter_task_gap_minutes = minutes;
        self
    }

    /// Sets the working window.
    pub fn with_work_day(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.work_day_start = start;
        self.work_day_end = end;
        self
    }

    /// Sets the ledger scope.
    pub fn with_ledger_scope(mut self, scope: LedgerScope) -> Self {
        self.ledger_scope = scope;
        self
    }

    /// Business calendar derived from the working window.
    pub fn calendar(&self) -> WorkCalendar {
        WorkCalendar::new(self.work_day_start, self.work_day_end)
    }

    /// Checks every policy constant.
    pub fn validate(&self) -> PlanningResult<()> {
        if self.work_day_end <= self.work_day_start {
            return Err(PlanningError::InvalidWorkDay {
                start: self.work_day_start,
                end: self.work_day_end,
            });
        }
        if self.minutes_per_unit <= 0 {
            return Err(PlanningError::NonPositiveMinutesPerUnit(
                self.minutes_per_unit,
            ));
        }
        if self.minutes_per_unit > MAX_MINUTES_PER_UNIT {
            return Err(PlanningError::MinutesPerUnitTooLarge {
                value: self.minutes_per_unit,
                max: MAX_MINUTES_PER_UNIT,
            });
        }
        if self.inter_task_gap_minutes < 0 {
            return Err(PlanningError::NegativeGap(self.inter_task_gap_minutes));
        }
        let day_length = self.calendar().day_length_minutes();
        if self.inter_task_gap_minutes > day_length {
            return Err(PlanningError::GapLongerThanDay {
                gap: self.inter_task_gap_minutes,
                day_length,
            });
        }
        Ok(())
    }

    /// Parses and validates a policy from JSON.
    pub fn from_json_str(json: &str) -> PlanningResult<Self> {
        let policy: Self = serde_json::from_str(json)
            .map_err(|e| PlanningError::InvalidSource(format!("invalid policy JSON: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Applies overrides from the process environment, then validates.
    pub fn apply_env_overrides(self) -> PlanningResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup, then validates.
    pub fn apply_overrides<F>(mut self, lookup: F) -> PlanningResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MINUTES_PER_UNIT) {
            self.minutes_per_unit = parse_minutes(ENV_MINUTES_PER_UNIT, &value)?;
        }
        if let Some(value) = lookup(ENV_TASK_BREAK_MINUTES) {
            self.inter_task_gap_minutes = parse_minutes(ENV_TASK_BREAK_MINUTES, &value)?;
        }
        if let Some(value) = lookup(ENV_WORK_DAY_START) {
            self.work_day_start = parse_clock(ENV_WORK_DAY_START, &value)?;
        }
        if let Some(value) = lookup(ENV_WORK_DAY_END) {
            self.work_day_end = parse_clock(ENV_WORK_DAY_END, &value)?;
        }
        self.validate()?;
        Ok(self)
    }
}

fn parse_minutes(key: &str, value: &str) -> PlanningResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| PlanningError::InvalidSource(format!("{key}: not an integer: {value:?}")))
}

fn parse_clock(key: &str, value: &str) -> PlanningResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| PlanningError::InvalidSource(format!("{key}: not a clock time: {value:?}")))
}
