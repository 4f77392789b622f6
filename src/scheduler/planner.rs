//! Stage-bucketed greedy planner.
//!
//! # Algorithm
//!
//! 1. Screen the input: invalid items and workers are excluded and reported.
//! 2. Partition the remaining items by stage, in stage order (Grading,
//!    Certifying, Preparing).
//! 3. Per bucket, order items with the rule engine (priority tier, then
//!    oldest reference date).
//! 4. Per item: skip it if already assigned, otherwise pick the
//!    least-loaded eligible worker, compute its next slot and commit the
//!    duration to the ledger.
//!
//! Single pass, no backtracking. Identical inputs give identical outputs.
//!
//! # Complexity
//! O(n log n + n log m) where n = items, m = eligible workers per bucket.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching;
//! Graham (1969), list scheduling on identical parallel machines

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::guard::DuplicateGuard;
use super::ledger::{LedgerEntry, LoadQueue, WorkloadLedger};
use super::slot::SlotCalculator;
use crate::config::{LedgerScope, PlanningPolicy};
use crate::dispatching::RuleEngine;
use crate::error::PlanningResult;
use crate::models::{Assignment, Schedule, Stage, Unassignable, WorkItem, Worker};
use crate::validation::{
    screen_work_items, screen_workers, ValidationError, ValidationErrorKind,
};

/// Input container for one planning run.
#[derive(Debug, Clone, Default)]
pub struct ScheduleRequest {
    /// Work items to plan.
    pub work_items: Vec<WorkItem>,
    /// Worker catalog. Catalog order breaks load ties.
    pub workers: Vec<Worker>,
    /// IDs of work items that already carry an assignment.
    pub already_assigned: HashSet<String>,
    /// Work committed before this run, per worker ID.
    pub committed_load: HashMap<String, LedgerEntry>,
    /// Date of the first slot of idle workers. Defaults to each item's
    /// reference date.
    pub start_date: Option<NaiveDate>,
}

impl ScheduleRequest {
    /// Creates a new request.
    pub fn new(work_items: Vec<WorkItem>, workers: Vec<Worker>) -> Self {
        Self {
            work_items,
            workers,
            ..Self::default()
        }
    }

    /// Adds already-assigned work item IDs.
    pub fn with_already_assigned<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.already_assigned.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Seeds a worker with already-committed work.
    pub fn with_committed_load(
        mut self,
        worker_id: impl Into<String>,
        minutes: i64,
        last_committed_end: Option<NaiveDateTime>,
    ) -> Self {
        self.committed_load.insert(
            worker_id.into(),
            LedgerEntry::seeded(minutes, last_committed_end),
        );
        self
    }

    /// Sets the planning start date.
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }
}

/// Final ledger state of one worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerLoad {
    /// Stage bucket of the ledger. `None` for a shared ledger.
    pub stage: Option<Stage>,
    /// Worker ID.
    pub worker_id: String,
    /// Ledger entry at the end of the bucket (or run).
    pub entry: LedgerEntry,
}

/// Everything a planning run produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    /// Assignments and unassignable items.
    pub schedule: Schedule,
    /// Items skipped because they were already assigned.
    pub already_assigned: Vec<String>,
    /// Items and workers excluded by screening.
    pub rejected: Vec<ValidationError>,
    /// Final ledgers.
    pub worker_loads: Vec<WorkerLoad>,
    /// Stage buckets not processed because the run was cancelled.
    pub unprocessed_stages: Vec<Stage>,
    /// Items of unprocessed buckets. They stay pending.
    pub pending: Vec<String>,
}

impl PlanOutcome {
    /// Whether every bucket was processed.
    pub fn is_complete(&self) -> bool {
        self.unprocessed_stages.is_empty()
    }

    /// Final ledger entries of a worker.
    pub fn loads_for_worker<'a>(
        &'a self,
        worker_id: &'a str,
    ) -> impl Iterator<Item = &'a WorkerLoad> + 'a {
        self.worker_loads
            .iter()
            .filter(move |l| l.worker_id == worker_id)
    }
}

/// Greedy least-loaded planner.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use grading_planner::models::{Stage, WorkItem, Worker};
/// use grading_planner::scheduler::{Planner, ScheduleRequest};
/// use grading_planner::PlanningPolicy;
///
/// let received = NaiveDate::from_ymd_opt(2025, 6, 2)
///     .unwrap()
///     .and_hms_opt(8, 0, 0)
///     .unwrap();
/// let items = vec![WorkItem::new("O1", Stage::Grading, received).with_size(10)];
/// let workers = vec![Worker::new("E1").with_capability(Stage::Grading)];
///
/// let outcome = Planner::new(PlanningPolicy::default())
///     .plan(&ScheduleRequest::new(items, workers))
///     .unwrap();
/// assert_eq!(outcome.schedule.assignment_count(), 1);
/// assert_eq!(outcome.schedule.assignments[0].duration_minutes, 30);
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    policy: PlanningPolicy,
    rule_engine: RuleEngine,
}

impl Planner {
    /// Creates a planner with the standard item order.
    pub fn new(policy: PlanningPolicy) -> Self {
        Self {
            policy,
            rule_engine: RuleEngine::standard(),
        }
    }

    /// Replaces the rule engine used to order items within a bucket.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Policy of this planner.
    pub fn policy(&self) -> &PlanningPolicy {
        &self.policy
    }

    /// Plans every bucket.
    ///
    /// # Errors
    /// A misconfigured policy is rejected before any item is processed.
    pub fn plan(&self, request: &ScheduleRequest) -> PlanningResult<PlanOutcome> {
        self.plan_until(request, || false)
    }

    /// Plans buckets until `should_stop` returns true.
    ///
    /// `should_stop` is checked before each bucket. A bucket is either
    /// fully processed or left untouched.
    #[instrument(
        name = "plan",
        skip_all,
        fields(
            items = request.work_items.len(),
            workers = request.workers.len(),
            scope = ?self.policy.ledger_scope,
        )
    )]
    pub fn plan_until<F>(
        &self,
        request: &ScheduleRequest,
        mut should_stop: F,
    ) -> PlanningResult<PlanOutcome>
    where
        F: FnMut() -> bool,
    {
        self.policy.validate()?;

        let guard = DuplicateGuard::new(request.already_assigned.iter().cloned());
        let (items, mut rejected) = screen_work_items(&request.work_items);
        let (workers, worker_rejections) = screen_workers(&request.workers);
        rejected.extend(worker_rejections);
        for error in &rejected {
            warn!(kind = ?error.kind, id = %error.entity_id, "{}", error.message);
        }

        let mut buckets: BTreeMap<Stage, Vec<&WorkItem>> = BTreeMap::new();
        for item in items {
            buckets.entry(item.stage.clone()).or_default().push(item);
        }

        let mut outcome = PlanOutcome {
            rejected,
            ..PlanOutcome::default()
        };
        let mut shared = WorkloadLedger::new();
        let mut cancelled = false;

        for (stage, bucket) in buckets {
            if !cancelled && should_stop() {
                info!(stage = %stage, "planning cancelled");
                cancelled = true;
            }
            if cancelled {
                outcome
                    .pending
                    .extend(bucket.iter().map(|item| item.id.clone()));
                outcome.unprocessed_stages.push(stage);
                continue;
            }

            match self.policy.ledger_scope {
                LedgerScope::PerStage => {
                    let mut ledger = WorkloadLedger::new();
                    self.plan_bucket(
                        &stage,
                        &bucket,
                        &workers,
                        request,
                        &guard,
                        &mut ledger,
                        &mut outcome,
                    );
                    outcome
                        .worker_loads
                        .extend(snapshot(&ledger, Some(&stage)));
                }
                LedgerScope::Shared => {
                    self.plan_bucket(
                        &stage,
                        &bucket,
                        &workers,
                        request,
                        &guard,
                        &mut shared,
                        &mut outcome,
                    );
                }
            }
        }

        if self.policy.ledger_scope == LedgerScope::Shared {
            outcome.worker_loads.extend(snapshot(&shared, None));
        }

        info!(
            assigned = outcome.schedule.assignment_count(),
            unassignable = outcome.schedule.unassignable.len(),
            already_assigned = outcome.already_assigned.len(),
            rejected = outcome.rejected.len(),
            pending = outcome.pending.len(),
            "planning finished"
        );

        Ok(outcome)
    }

    /// Plans one stage bucket against `ledger`.
    #[allow(clippy::too_many_arguments)]
    fn plan_bucket(
        &self,
        stage: &Stage,
        items: &[&WorkItem],
        workers: &[&Worker],
        request: &ScheduleRequest,
        guard: &DuplicateGuard,
        ledger: &mut WorkloadLedger,
        outcome: &mut PlanOutcome,
    ) {
        let calculator =
            SlotCalculator::new(self.policy.calendar(), self.policy.inter_task_gap_minutes);

        let candidates: Vec<(usize, usize)> = workers
            .iter()
            .enumerate()
            .filter(|(_, worker)| worker.is_eligible_for(stage))
            .map(|(position, worker)| {
                let slot = ledger.open(&worker.id, request.committed_load.get(&worker.id));
                (position, slot)
            })
            .collect();

        if candidates.is_empty() {
            warn!(stage = %stage, items = items.len(), "no eligible worker for stage");
        } else {
            debug!(
                stage = %stage,
                items = items.len(),
                workers = candidates.len(),
                "planning bucket"
            );
        }

        let mut queue = LoadQueue::new(ledger, &candidates);

        for item in self.rule_engine.order(items) {
            if guard.already_assigned(&item.id) {
                debug!(item = %item.display_name(), "already assigned, skipped");
                outcome.already_assigned.push(item.id.clone());
                continue;
            }

            let Some(slot) = queue.peek() else {
                debug!(item = %item.display_name(), stage = %stage, "unassignable");
                outcome.schedule.add_unassignable(Unassignable::no_eligible_worker(
                    &item.id,
                    stage.clone(),
                ));
                continue;
            };

            let anchor = request
                .start_date
                .unwrap_or_else(|| item.reference_date.date());
            let last_end = ledger.at(slot).last_committed_end;
            let placed = item
                .duration_minutes(self.policy.minutes_per_unit)
                .and_then(|duration| {
                    calculator
                        .next_slot(last_end, duration, anchor)
                        .map(|window| (duration, window))
                });
            let Some((duration, window)) = placed else {
                let error = ValidationError::new(
                    ValidationErrorKind::DurationOutOfRange,
                    &item.id,
                    format!("work item {} cannot be placed in a time slot", item.id),
                );
                warn!(
                    kind = ?error.kind,
                    id = %error.entity_id,
                    size = item.size,
                    "{}",
                    error.message
                );
                outcome.rejected.push(error);
                continue;
            };

            ledger.commit(slot, duration, window.end);
            queue.update(slot, ledger.at(slot).cumulative_minutes);

            let assignment = Assignment {
                work_item_id: item.id.clone(),
                worker_id: ledger.worker_id(slot).to_string(),
                start: window.start,
                end: window.end,
                duration_minutes: duration,
                size: item.size,
                priority: item.priority.clone(),
                stage: stage.clone(),
            };
            debug!(
                item = %item.display_name(),
                worker = %assignment.worker_id,
                start = %assignment.start,
                end = %assignment.end,
                "assigned"
            );
            outcome.schedule.add_assignment(assignment);
        }
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlanningPolicy::default())
    }
}

fn snapshot<'a>(
    ledger: &'a WorkloadLedger,
    stage: Option<&'a Stage>,
) -> impl Iterator<Item = WorkerLoad> + 'a {
    ledger.iter().map(move |(worker_id, entry)| WorkerLoad {
        stage: stage.cloned(),
        worker_id: worker_id.to_string(),
        entry: *entry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_MINUTES_PER_UNIT;
    use crate::dispatching::rules;
    use crate::error::PlanningError;
    use crate::models::{UnassignableReason, WorkCalendar};
    use crate::validation::ValidationErrorKind;
    use chrono::{Duration, NaiveTime};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn item(id: &str, stage: Stage, priority: &str, size: u32) -> WorkItem {
        WorkItem::new(id, stage, at(2, 8, 0))
            .with_priority(priority)
            .with_size(size)
    }

    fn grader(id: &str) -> Worker {
        Worker::new(id).with_capability(Stage::Grading)
    }

    fn assignment<'a>(outcome: &'a PlanOutcome, id: &str) -> &'a Assignment {
        outcome.schedule.assignment_for_item(id).unwrap()
    }

    #[test]
    fn test_three_items_two_workers() {
        crate::logging::init_test();
        let items = vec![
            item("A", Stage::Grading, "X", 10),
            item("B", Stage::Grading, "X", 5),
            item("C", Stage::Grading, "E", 20),
        ];
        let workers = vec![grader("E1"), grader("E2")];
        let outcome = Planner::default()
            .plan(&ScheduleRequest::new(items, workers))
            .unwrap();

        let ids: Vec<&str> = outcome
            .schedule
            .assignments
            .iter()
            .map(|a| a.work_item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "B", "C"]);

        let a = assignment(&outcome, "A");
        assert_eq!((a.worker_id.as_str(), a.start, a.end), ("E1", at(2, 9, 0), at(2, 9, 30)));

        let b = assignment(&outcome, "B");
        assert_eq!((b.worker_id.as_str(), b.start, b.end), ("E2", at(2, 9, 0), at(2, 9, 15)));

        // E2 carries 15 min < 30 min, so the 60 min item goes there after the gap.
        let c = assignment(&outcome, "C");
        assert_eq!(c.worker_id, "E2");
        assert_eq!(c.start, at(2, 9, 20));
        assert_eq!(c.end, at(2, 10, 20));
        assert_eq!(c.duration_minutes, 60);
    }

    #[test]
    fn test_rollover_after_seeded_day() {
        // 7h50m already committed, ending 16:50.
        let items = vec![item("O1", Stage::Grading, "F", 10)];
        let request = ScheduleRequest::new(items, vec![grader("E1")])
            .with_committed_load("E1", 470, Some(at(2, 16, 50)))
            .with_start_date(at(2, 0, 0).date());
        let outcome = Planner::default().plan(&request).unwrap();

        let a = assignment(&outcome, "O1");
        assert_eq!(a.start, at(3, 9, 0));
        assert_eq!(a.end, at(3, 9, 30));

        let load = outcome.loads_for_worker("E1").next().unwrap();
        assert_eq!(load.entry.cumulative_minutes, 500);
        assert_eq!(load.entry.assigned_minutes(), 30);
    }

    #[test]
    fn test_chaining_rolls_into_next_day() {
        // 16 items of 10 cards (30 min) on one worker: 09:00, 09:35, ...
        let items: Vec<WorkItem> = (0..16)
            .map(|i| item(&format!("O{i:02}"), Stage::Grading, "F", 10))
            .collect();
        let outcome = Planner::default()
            .plan(&ScheduleRequest::new(items, vec![grader("E1")]))
            .unwrap();

        // 13 tasks fit: the 13th starts 09:00 + 12 * 35 min = 16:00.
        let thirteenth = assignment(&outcome, "O12");
        assert_eq!(thirteenth.start, at(2, 16, 0));
        assert_eq!(thirteenth.end, at(2, 16, 30));

        // 16:35 + 30 min > 17:00.
        let fourteenth = assignment(&outcome, "O13");
        assert_eq!(fourteenth.start, at(3, 9, 0));
    }

    #[test]
    fn test_multi_day_task_overflows_without_split() {
        let items = vec![
            item("small", Stage::Grading, "X", 1),
            item("huge", Stage::Grading, "F", 200),
        ];
        let outcome = Planner::default()
            .plan(&ScheduleRequest::new(items, vec![grader("E1")]))
            .unwrap();

        let huge = assignment(&outcome, "huge");
        assert_eq!(huge.duration_minutes, 600);
        assert_eq!(huge.start, at(3, 9, 0));
        assert_eq!(huge.end, at(3, 19, 0));
        assert_eq!(outcome.schedule.assignment_count(), 2);
    }

    #[test]
    fn test_idempotence() {
        let items = vec![
            item("A", Stage::Grading, "F", 4),
            item("B", Stage::Certifying, "X", 2),
            item("C", Stage::Grading, "C", 7),
        ];
        let workers = vec![
            grader("E1"),
            Worker::new("E2").with_capability(Stage::Certifying),
        ];
        let request = ScheduleRequest::new(items, workers);
        let planner = Planner::default();

        let first = planner.plan(&request).unwrap();
        let second = planner.plan(&request).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.schedule).unwrap(),
            serde_json::to_string(&second.schedule).unwrap()
        );

        let assigned: Vec<String> = first
            .schedule
            .assignments
            .iter()
            .map(|a| a.work_item_id.clone())
            .collect();
        let rerun = planner
            .plan(&request.clone().with_already_assigned(assigned))
            .unwrap();
        assert_eq!(rerun.schedule.assignment_count(), 0);
        assert_eq!(rerun.already_assigned.len(), 3);
    }

    #[test]
    fn test_guard_skips_before_eligibility() {
        let items = vec![
            item("done", Stage::Preparing, "X", 1),
            item("open", Stage::Preparing, "X", 1),
        ];
        let request =
            ScheduleRequest::new(items, vec![grader("E1")]).with_already_assigned(["done"]);
        let outcome = Planner::default().plan(&request).unwrap();

        assert_eq!(outcome.already_assigned, vec!["done".to_string()]);
        assert_eq!(outcome.schedule.unassignable.len(), 1);
        assert_eq!(outcome.schedule.unassignable[0].work_item_id, "open");
    }

    #[test]
    fn test_empty_worker_pool_for_one_stage() {
        let items = vec![
            item("G1", Stage::Grading, "F", 1),
            item("P1", Stage::Preparing, "F", 1),
            item("P2", Stage::Preparing, "X", 1),
        ];
        let workers = vec![grader("E1"), grader("E2").with_active(false)];
        let outcome = Planner::default()
            .plan(&ScheduleRequest::new(items, workers))
            .unwrap();

        assert_eq!(outcome.schedule.assignment_count(), 1);
        assert_eq!(outcome.schedule.unassignable.len(), 2);
        assert!(outcome.schedule.unassignable.iter().all(|u| {
            u.reason == UnassignableReason::NoEligibleWorker && u.stage == Stage::Preparing
        }));
    }

    #[test]
    fn test_screening_rejections_reported() {
        let items = vec![
            item("ok", Stage::Grading, "F", 1),
            item("empty", Stage::Grading, "F", 0),
            item("odd", Stage::from_code("TO_SCAN"), "F", 1),
            item("ok", Stage::Grading, "X", 9),
        ];
        let outcome = Planner::default()
            .plan(&ScheduleRequest::new(items, vec![grader("E1")]))
            .unwrap();

        assert_eq!(outcome.schedule.assignment_count(), 1);
        assert_eq!(assignment(&outcome, "ok").size, 1);
        let kinds: Vec<ValidationErrorKind> = outcome.rejected.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ValidationErrorKind::InvalidSize,
                ValidationErrorKind::UnknownStage,
                ValidationErrorKind::DuplicateId,
            ]
        );
    }

    #[test]
    fn test_policy_misconfiguration_is_fatal() {
        let policy = PlanningPolicy::default().with_work_day(
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        );
        let request =
            ScheduleRequest::new(vec![item("A", Stage::Grading, "F", 1)], vec![grader("E1")]);
        let err = Planner::new(policy).plan(&request).unwrap_err();
        assert!(matches!(err, PlanningError::InvalidWorkDay { .. }));

        let err = Planner::new(PlanningPolicy::default().with_minutes_per_unit(0))
            .plan(&request)
            .unwrap_err();
        assert_eq!(err, PlanningError::NonPositiveMinutesPerUnit(0));
    }

    #[test]
    fn test_stage_order_and_roles() {
        let items = vec![
            item("P", Stage::Preparing, "X", 1),
            item("C", Stage::Certifying, "X", 1),
            item("G", Stage::Grading, "X", 1),
        ];
        let workers = vec![
            Worker::new("prep").with_role("ROLE_PREPARATEUR"),
            Worker::new("cert").with_role("ROLE_CERTIFICATEUR"),
            Worker::new("note").with_role("ROLE_NOTEUR"),
        ];
        let outcome = Planner::default()
            .plan(&ScheduleRequest::new(items, workers))
            .unwrap();

        let order: Vec<(&str, &str)> = outcome
            .schedule
            .assignments
            .iter()
            .map(|a| (a.work_item_id.as_str(), a.worker_id.as_str()))
            .collect();
        assert_eq!(order, vec![("G", "note"), ("C", "cert"), ("P", "prep")]);
    }

    #[test]
    fn test_per_stage_versus_shared_ledger() {
        let items = vec![
            item("G", Stage::Grading, "F", 10),
            item("C", Stage::Certifying, "F", 10),
        ];
        let workers = vec![Worker::new("E1")
            .with_capability(Stage::Grading)
            .with_capability(Stage::Certifying)];
        let request = ScheduleRequest::new(items, workers);

        let per_stage = Planner::default().plan(&request).unwrap();
        assert_eq!(assignment(&per_stage, "G").start, at(2, 9, 0));
        assert_eq!(assignment(&per_stage, "C").start, at(2, 9, 0));
        assert_eq!(per_stage.worker_loads.len(), 2);

        let shared = Planner::new(PlanningPolicy::default().with_ledger_scope(LedgerScope::Shared))
            .plan(&request)
            .unwrap();
        assert_eq!(assignment(&shared, "G").start, at(2, 9, 0));
        assert_eq!(assignment(&shared, "C").start, at(2, 9, 35));
        assert!(shared.schedule.find_overlap().is_none());
        assert_eq!(shared.worker_loads.len(), 1);
        assert_eq!(shared.worker_loads[0].stage, None);
        assert_eq!(shared.worker_loads[0].entry.cumulative_minutes, 60);
    }

    #[test]
    fn test_cancellation_between_buckets() {
        crate::logging::init_test();
        let items = vec![
            item("G", Stage::Grading, "F", 1),
            item("C", Stage::Certifying, "F", 1),
            item("P", Stage::Preparing, "F", 1),
        ];
        let workers = vec![Worker::new("E1")
            .with_role("ROLE_NOTEUR")
            .with_role("ROLE_CERTIFICATEUR")
            .with_role("ROLE_PREPARATEUR")];
        let mut checks = 0;
        let outcome = Planner::default()
            .plan_until(&ScheduleRequest::new(items, workers), || {
                checks += 1;
                checks > 1
            })
            .unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.schedule.assignment_count(), 1);
        assert_eq!(outcome.schedule.assignments[0].work_item_id, "G");
        assert_eq!(
            outcome.unprocessed_stages,
            vec![Stage::Certifying, Stage::Preparing]
        );
        assert_eq!(outcome.pending, vec!["C".to_string(), "P".to_string()]);
        assert_eq!(checks, 2);
    }

    #[test]
    fn test_start_date_overrides_reference_date() {
        let items = vec![item("A", Stage::Grading, "F", 1)];
        let request = ScheduleRequest::new(items, vec![grader("E1")])
            .with_start_date(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        let outcome = Planner::default().plan(&request).unwrap();
        assert_eq!(assignment(&outcome, "A").start, at(10, 9, 0));
    }

    #[test]
    fn test_custom_rule_engine() {
        let items = vec![
            item("big", Stage::Grading, "X", 30),
            item("small", Stage::Grading, "E", 1),
        ];
        let planner = Planner::default()
            .with_rule_engine(RuleEngine::new().with_rule(rules::SmallestFirst));
        let outcome = planner
            .plan(&ScheduleRequest::new(items, vec![grader("E1")]))
            .unwrap();
        assert_eq!(outcome.schedule.assignments[0].work_item_id, "small");
    }

    #[test]
    fn test_sub_second_reference_dates_ordered() {
        let received = |ms| {
            NaiveDate::from_ymd_opt(2025, 6, 2)
                .unwrap()
                .and_hms_milli_opt(8, 0, 0, ms)
                .unwrap()
        };
        let items = vec![
            WorkItem::new("newer", Stage::Grading, received(900)).with_size(1),
            WorkItem::new("older", Stage::Grading, received(100)).with_size(1),
        ];
        let outcome = Planner::default()
            .plan(&ScheduleRequest::new(items, vec![grader("E1")]))
            .unwrap();

        let ids: Vec<&str> = outcome
            .schedule
            .assignments
            .iter()
            .map(|a| a.work_item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["older", "newer"]);
        assert_eq!(assignment(&outcome, "older").start, at(2, 9, 0));
    }

    #[test]
    fn test_oversized_item_rejected_alone() {
        let policy = PlanningPolicy::default().with_minutes_per_unit(MAX_MINUTES_PER_UNIT);
        let items = vec![
            item("huge", Stage::Grading, "X", u32::MAX),
            item("ok", Stage::Grading, "F", 1),
        ];
        let outcome = Planner::new(policy)
            .plan(&ScheduleRequest::new(items, vec![grader("E1")]))
            .unwrap();

        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].kind, ValidationErrorKind::DurationOutOfRange);
        assert_eq!(outcome.rejected[0].entity_id, "huge");
        assert!(outcome.schedule.assignment_for_item("huge").is_none());

        // Nothing was committed for the rejected item.
        let ok = assignment(&outcome, "ok");
        assert_eq!(ok.start, at(2, 9, 0));
        assert_eq!(ok.duration_minutes, MAX_MINUTES_PER_UNIT);
        let load = outcome.loads_for_worker("E1").next().unwrap();
        assert_eq!(load.entry.cumulative_minutes, MAX_MINUTES_PER_UNIT);
    }

    #[test]
    fn test_oversized_policy_is_fatal() {
        let request = ScheduleRequest::new(vec![item("A", Stage::Grading, "F", 1)], vec![]);

        let policy = PlanningPolicy::default().with_minutes_per_unit(i64::MAX / 2);
        let err = Planner::new(policy).plan(&request).unwrap_err();
        assert!(matches!(err, PlanningError::MinutesPerUnitTooLarge { .. }));

        let policy = PlanningPolicy::default().with_gap_minutes(i64::MAX / 2);
        let err = Planner::new(policy).plan(&request).unwrap_err();
        assert!(matches!(err, PlanningError::GapLongerThanDay { .. }));
    }

    #[test]
    fn test_custom_policy_constants() {
        let policy = PlanningPolicy::default()
            .with_minutes_per_unit(2)
            .with_gap_minutes(0)
            .with_work_day(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            );
        let items = vec![
            item("A", Stage::Grading, "X", 30),
            item("B", Stage::Grading, "F", 30),
        ];
        let outcome = Planner::new(policy)
            .plan(&ScheduleRequest::new(items, vec![grader("E1")]))
            .unwrap();
        assert_eq!(assignment(&outcome, "A").end, at(2, 10, 0));
        assert_eq!(assignment(&outcome, "B").start, at(2, 10, 0));
    }

    fn random_case(rng: &mut StdRng) -> ScheduleRequest {
        const PRIORITIES: [&str; 7] = ["X", "F+", "F", "C", "E", "", "URGENT"];

        let workers: Vec<Worker> = (0..rng.random_range(1..=5))
            .map(|w| {
                let mut worker = Worker::new(format!("E{w}"));
                for stage in Stage::ALL {
                    if rng.random_bool(0.6) {
                        worker = worker.with_capability(stage);
                    }
                }
                worker
            })
            .collect();

        let items: Vec<WorkItem> = (0..rng.random_range(0..=60))
            .map(|i| {
                let stage = Stage::ALL[rng.random_range(0..Stage::ALL.len())].clone();
                let priority = PRIORITIES[rng.random_range(0..PRIORITIES.len())];
                let received = at(1, 8, 0) + Duration::hours(rng.random_range(0..240));
                WorkItem::new(format!("O{i}"), stage, received)
                    .with_priority(priority)
                    .with_size(rng.random_range(1..=60))
            })
            .collect();

        ScheduleRequest::new(items, workers)
    }

    #[test]
    fn test_randomized_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let calendar = WorkCalendar::default();
        let planner = Planner::default();

        for _ in 0..50 {
            let request = random_case(&mut rng);
            let outcome = planner.plan(&request).unwrap();

            // No silent drops.
            assert_eq!(
                outcome.schedule.assignment_count() + outcome.schedule.unassignable.len(),
                request.work_items.len()
            );

            let mut replayed: HashMap<(Stage, String), i64> = HashMap::new();
            for a in &outcome.schedule.assignments {
                // Containment.
                if a.duration_minutes <= calendar.day_length_minutes() {
                    assert!(a.start >= calendar.opening(a.start.date()));
                    assert!(a.end <= calendar.closing(a.start.date()));
                }

                // Least-loaded invariant at the decision point.
                let chosen = replayed
                    .get(&(a.stage.clone(), a.worker_id.clone()))
                    .copied()
                    .unwrap_or(0);
                for worker in request.workers.iter().filter(|w| w.is_eligible_for(&a.stage)) {
                    let other = replayed
                        .get(&(a.stage.clone(), worker.id.clone()))
                        .copied()
                        .unwrap_or(0);
                    assert!(chosen <= other);
                }
                *replayed
                    .entry((a.stage.clone(), a.worker_id.clone()))
                    .or_default() += a.duration_minutes;
            }

            // Capacity conservation.
            for load in &outcome.worker_loads {
                let stage = load.stage.clone().unwrap();
                let sum = replayed
                    .get(&(stage, load.worker_id.clone()))
                    .copied()
                    .unwrap_or(0);
                assert_eq!(sum, load.entry.cumulative_minutes);
            }

            // No overlap per worker within a bucket.
            for stage in Stage::ALL {
                let mut bucket = Schedule::new();
                for a in outcome.schedule.assignments.iter().filter(|a| a.stage == stage) {
                    bucket.add_assignment(a.clone());
                }
                assert!(bucket.find_overlap().is_none());
            }
        }
    }

    #[test]
    fn test_randomized_shared_scope_never_overlaps() {
        let mut rng = StdRng::seed_from_u64(7);
        let planner =
            Planner::new(PlanningPolicy::default().with_ledger_scope(LedgerScope::Shared));

        for _ in 0..50 {
            let request = random_case(&mut rng);
            let outcome = planner.plan(&request).unwrap();
            assert!(outcome.schedule.find_overlap().is_none());

            for load in &outcome.worker_loads {
                assert_eq!(
                    outcome.schedule.worker_minutes(&load.worker_id),
                    load.entry.cumulative_minutes
                );
            }
        }
    }
}
