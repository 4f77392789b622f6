//! Dispatching rules and rule engine for work item ordering.
//!
//! Decides the order in which pending work items of one stage bucket are
//! offered to workers. The standard order is priority tier (highest first),
//! then reference date (oldest first), with stable ties.
//!
//! # Usage
//!
//! ```
//! use grading_planner::dispatching::{rules, RuleEngine};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::PriorityTier)
//!     .with_rule(rules::OldestFirst);
//! assert_eq!(engine.rule_names(), vec!["PRIORITY_TIER", "OLDEST_FIRST"]);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod engine;
pub mod rules;

pub use engine::{RuleEngine, TieBreaker};

use crate::models::WorkItem;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (scheduled first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates work item priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules return smaller values for
/// items that should be scheduled first.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "PRIORITY_TIER").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a work item.
    fn evaluate(&self, item: &WorkItem) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
