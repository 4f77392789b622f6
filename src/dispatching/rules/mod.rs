//! Built-in dispatching rules.
//!
//! - **Priority**: PRIORITY_TIER
//! - **Age**: OLDEST_FIRST
//! - **Size**: SMALLEST_FIRST
//!
//! # Score Convention
//! All rules return lower scores for higher priority items.

use super::{DispatchingRule, RuleScore};
use crate::models::WorkItem;

/// Priority tier rule.
///
/// Prioritizes items with a higher tier rank (X > F+ > F > C > E >
/// unknown). Negated because lower score = higher priority.
#[derive(Debug, Clone, Copy)]
pub struct PriorityTier;

impl DispatchingRule for PriorityTier {
    fn name(&self) -> &'static str {
        "PRIORITY_TIER"
    }

    fn evaluate(&self, item: &WorkItem) -> RuleScore {
        -f64::from(item.priority.rank())
    }

    fn description(&self) -> &'static str {
        "Priority Tier"
    }
}

/// Oldest reference date first.
///
/// Scores by the reference date in microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy)]
pub struct OldestFirst;

impl DispatchingRule for OldestFirst {
    fn name(&self) -> &'static str {
        "OLDEST_FIRST"
    }

    fn evaluate(&self, item: &WorkItem) -> RuleScore {
        item.reference_date.and_utc().timestamp_micros() as f64
    }

    fn description(&self) -> &'static str {
        "Oldest Reference Date First"
    }
}

/// Smallest item first.
///
/// Shortest-processing-time analogue: fewer cards, shorter task.
#[derive(Debug, Clone, Copy)]
pub struct SmallestFirst;

impl DispatchingRule for SmallestFirst {
    fn name(&self) -> &'static str {
        "SMALLEST_FIRST"
    }

    fn evaluate(&self, item: &WorkItem) -> RuleScore {
        f64::from(item.size)
    }

    fn description(&self) -> &'static str {
        "Smallest Item First"
    }
}
