//! Workload planner for card grading orders.
//!
//! Assigns pending orders to employees: orders are ordered by priority tier,
//! each goes to the least-loaded employee qualified for its stage, and gets
//! a time slot inside the working day, chained after the employee's previous
//! task with a short break. Orders that already carry an assignment are
//! never assigned twice.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `WorkItem`, `Worker`, `Stage`,
//!   `PriorityCode`, `WorkCalendar`, `Schedule`, `Assignment`
//! - **`dispatching`**: Item ordering rules and rule engine
//! - **`scheduler`**: `Planner`, workload ledger, slot calculator, KPIs
//! - **`store`**: Catalog loader and assignment sink seams, in-memory
//!   implementations
//! - **`validation`**: Input screening (duplicate IDs, empty items, unknown
//!   stages)
//! - **`config`**: Planning policy constants, JSON and environment loading
//! - **`logging`**: `tracing` subscriber setup
//!
//! # Architecture
//!
//! The planner is pure: it takes in-memory catalogs and returns a plan
//! outcome. Loading and persistence go through the `store` traits.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Graham (1969), "Bounds on Multiprocessing Timing Anomalies"

pub mod config;
pub mod dispatching;
pub mod error;
pub mod logging;
pub mod models;
pub mod scheduler;
pub mod store;
pub mod validation;

pub use config::{LedgerScope, PlanningPolicy};
pub use error::{PlanningError, PlanningResult, StoreError};
