//! Rule engine for multi-criteria dispatching.
//!
//! Composes dispatching rules evaluated in sequence: the next rule is
//! consulted only when all previous rules tie.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, DispatchingRule};
use crate::models::WorkItem;

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Default)]
pub enum TieBreaker {
    /// Keep input order (stable sort).
    #[default]
    Stable,
    /// Deterministic by work item ID (lexicographic).
    ById,
}

/// A composable rule engine for work item ordering.
///
/// # Example
/// ```
/// use grading_planner::dispatching::{rules, RuleEngine, TieBreaker};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::PriorityTier)
///     .with_rule(rules::SmallestFirst)
///     .with_final_tie_breaker(TieBreaker::ById);
/// assert_eq!(engine.rule_names().len(), 2);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine (every item ties; input order kept).
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::Stable,
            epsilon: 1e-9,
        }
    }

    /// Standard order: priority tier, then oldest reference date.
    pub fn standard() -> Self {
        Self::new()
            .with_rule(rules::PriorityTier)
            .with_rule(rules::OldestFirst)
    }

    /// Appends a rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Sorts items by priority (highest priority first).
    ///
    /// Returns indices into the given slice. The sort is stable: items
    /// that tie on every rule keep their relative input order unless the
    /// final tie-breaker says otherwise.
    pub fn sort_indices(&self, items: &[&WorkItem]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..items.len()).collect();
        indices.sort_by(|&a, &b| self.compare(items[a], items[b]));
        indices
    }

    /// Returns the items in dispatch order.
    pub fn order<'a>(&self, items: &[&'a WorkItem]) -> Vec<&'a WorkItem> {
        self.sort_indices(items)
            .into_iter()
            .map(|i| items[i])
            .collect()
    }

    /// Compares two items under the configured rules.
    pub fn compare(&self, a: &WorkItem, b: &WorkItem) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a);
            let score_b = rule.evaluate(b);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }

        match &self.tie_breaker {
            TieBreaker::Stable => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
