//! Assignment engine and plan metrics.
//!
//! # Algorithm
//!
//! `Planner` is a greedy, single-pass list scheduler. Items are processed
//! per stage bucket in priority order; each goes to the least-loaded
//! eligible worker, at the worker's next slot inside the working day. It
//! does not search for an optimal plan.
//!
//! # Components
//!
//! - [`WorkloadLedger`] and [`LoadQueue`]: per-worker load and least-loaded
//!   selection
//! - [`SlotCalculator`]: next start with inter-task gap and day rollover
//! - [`DuplicateGuard`]: skips items that already have an assignment
//! - [`PlanKpi`] and [`WorkloadSummary`]: run statistics
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

mod guard;
mod kpi;
mod ledger;
mod planner;
mod slot;

pub use guard::DuplicateGuard;
pub use kpi::{format_duration, PlanKpi, WorkloadLevel, WorkloadSummary};
pub use ledger::{LedgerEntry, LoadQueue, WorkloadLedger};
pub use planner::{PlanOutcome, Planner, ScheduleRequest, WorkerLoad};
pub use slot::SlotCalculator;
