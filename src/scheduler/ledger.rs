//! Workload ledger and least-loaded selection.
//!
//! The ledger is transient bookkeeping for one planning run: per worker,
//! the cumulative assigned minutes and the end of the last committed task.
//! Entries only grow. The planner owns the ledger exclusively while a stage
//! bucket is processed, so selecting a worker and committing its new load
//! happen together.
//!
//! # Selection
//! [`LoadQueue`] is a binary min-heap keyed by (cumulative minutes, catalog
//! position). The top is the least-loaded worker, ties going to the worker
//! listed first in the catalog. After each commit the top is re-keyed in
//! place, O(log m) per item.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Ledger state of one worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Total minutes, including seeded minutes.
    pub cumulative_minutes: i64,
    /// Minutes already committed before this run started.
    pub seeded_minutes: i64,
    /// End of the latest committed task.
    pub last_committed_end: Option<NaiveDateTime>,
    /// Tasks committed during this run.
    pub task_count: u32,
}

impl LedgerEntry {
    /// Entry for a worker resuming with already-committed work.
    pub fn seeded(minutes: i64, last_committed_end: Option<NaiveDateTime>) -> Self {
        Self {
            cumulative_minutes: minutes,
            seeded_minutes: minutes,
            last_committed_end,
            task_count: 0,
        }
    }

    /// Minutes assigned during this run.
    #[inline]
    pub fn assigned_minutes(&self) -> i64 {
        self.cumulative_minutes.saturating_sub(self.seeded_minutes)
    }

    fn commit(&mut self, duration_minutes: i64, end: NaiveDateTime) {
        self.cumulative_minutes = self.cumulative_minutes.saturating_add(duration_minutes);
        self.last_committed_end = Some(match self.last_committed_end {
            Some(previous) => previous.max(end),
            None => end,
        });
        self.task_count += 1;
    }
}

/// Per-worker ledger entries for one run (or one stage bucket).
#[derive(Debug, Clone, Default)]
pub struct WorkloadLedger {
    worker_ids: Vec<String>,
    entries: Vec<LedgerEntry>,
    index: HashMap<String, usize>,
}

impl WorkloadLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot of a worker, creating its entry if needed.
    ///
    /// New entries start from `seed` when given, otherwise at zero.
    pub fn open(&mut self, worker_id: &str, seed: Option<&LedgerEntry>) -> usize {
        if let Some(&slot) = self.index.get(worker_id) {
            return slot;
        }
        let slot = self.entries.len();
        let entry = seed
            .map(|s| LedgerEntry::seeded(s.cumulative_minutes, s.last_committed_end))
            .unwrap_or_default();
        self.worker_ids.push(worker_id.to_string());
        self.entries.push(entry);
        self.index.insert(worker_id.to_string(), slot);
        slot
    }

    /// Entry at a slot.
    #[inline]
    pub fn at(&self, slot: usize) -> &LedgerEntry {
        &self.entries[slot]
    }

    /// Worker ID at a slot.
    #[inline]
    pub fn worker_id(&self, slot: usize) -> &str {
        &self.worker_ids[slot]
    }

    /// Entry of a worker.
    pub fn entry(&self, worker_id: &str) -> Option<&LedgerEntry> {
        self.index.get(worker_id).map(|&slot| &self.entries[slot])
    }

    /// Records a committed task.
    pub fn commit(&mut self, slot: usize, duration_minutes: i64, end: NaiveDateTime) {
        self.entries[slot].commit(duration_minutes, end);
    }

    /// Number of workers in the ledger.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger has no workers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order workers were opened.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LedgerEntry)> {
        self.worker_ids
            .iter()
            .map(String::as_str)
            .zip(self.entries.iter())
    }
}

/// Least-loaded priority queue over a set of eligible ledger slots.
#[derive(Debug, Clone)]
pub struct LoadQueue {
    heap: BinaryHeap<Reverse<(i64, usize, usize)>>,
}

impl LoadQueue {
    /// Builds a queue over `(catalog position, ledger slot)` pairs.
    pub fn new(ledger: &WorkloadLedger, candidates: &[(usize, usize)]) -> Self {
        let heap = candidates
            .iter()
            .map(|&(position, slot)| Reverse((ledger.at(slot).cumulative_minutes, position, slot)))
            .collect();
        Self { heap }
    }

    /// Ledger slot of the least-loaded worker.
    pub fn peek(&self) -> Option<usize> {
        self.heap.peek().map(|Reverse((_, _, slot))| *slot)
    }

    /// Re-keys a slot after its load changed.
    ///
    /// The slot is normally the current top; any other slot falls back to
    /// a full rebuild.
    pub fn update(&mut self, slot: usize, cumulative_minutes: i64) {
        if let Some(mut top) = self.heap.peek_mut() {
            let Reverse((_, position, top_slot)) = *top;
            if top_slot == slot {
                *top = Reverse((cumulative_minutes, position, slot));
                return;
            }
        }

        let rebuilt = self
            .heap
            .drain()
            .map(|Reverse((load, position, s))| {
                let load = if s == slot { cumulative_minutes } else { load };
                Reverse((load, position, s))
            })
            .collect();
        self.heap = rebuilt;
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
