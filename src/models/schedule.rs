//! Schedule (solution) model.
//!
//! The decoded result of a solve: the worker × slot assignment table,
//! the per-slot understaffing series, and the fairness ceiling. Rows
//! follow roster order and columns follow catalog order, so consumers
//! (rendering, export) see a deterministic layout for a given request.

use serde::{Deserialize, Serialize};

use super::{ShiftCatalog, Slot, SLOT_COUNT};
use crate::cp::SolveStatus;

/// Worker × slot 0/1 assignment table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleTable {
    /// Row headers (roster order).
    pub workers: Vec<String>,
    /// Column headers (catalog order).
    pub slots: Vec<Slot>,
    /// `cells[w][s]` is 1 if worker `w` works slot `s`.
    pub cells: Vec<Vec<u8>>,
}

/// Per-slot shortfall, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderstaffTable {
    /// Slots (catalog order).
    pub slots: Vec<Slot>,
    /// Shortfall per slot.
    pub counts: Vec<u32>,
}

/// A solved weekly roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSolution {
    /// `Optimal` or `Feasible`. Feasible means the time budget ran out
    /// before optimality was proven.
    pub status: SolveStatus,
    /// Objective value of the returned assignment.
    pub objective: i64,
    /// Assignment table.
    pub schedule: ScheduleTable,
    /// Shortfall per slot.
    pub understaff: UnderstaffTable,
    /// Fairness ceiling: upper bound on (at optimality, equal to) the
    /// busiest worker's slot count.
    pub fairness: u32,
}

impl ScheduleTable {
    /// Creates an all-zero table for the given roster over the catalog.
    pub fn empty(workers: Vec<String>) -> Self {
        let cells = vec![vec![0; SLOT_COUNT]; workers.len()];
        Self {
            workers,
            slots: ShiftCatalog::slots(),
            cells,
        }
    }

    fn worker_index(&self, worker: &str) -> Option<usize> {
        self.workers.iter().position(|w| w == worker)
    }

    /// Whether a worker is assigned to a slot.
    pub fn is_assigned(&self, worker: &str, slot: Slot) -> bool {
        self.worker_index(worker)
            .map(|w| self.cells[w][slot.index()] == 1)
            .unwrap_or(false)
    }

    /// The 0/1 row of a worker.
    pub fn row(&self, worker: &str) -> Option<&[u8]> {
        self.worker_index(worker).map(|w| self.cells[w].as_slice())
    }

    /// Number of slots assigned to a worker.
    pub fn load(&self, worker: &str) -> u32 {
        self.row(worker)
            .map(|r| r.iter().map(|&c| c as u32).sum())
            .unwrap_or(0)
    }

    /// Per-worker loads in roster order.
    pub fn loads(&self) -> Vec<u32> {
        self.cells
            .iter()
            .map(|r| r.iter().map(|&c| c as u32).sum())
            .collect()
    }

    /// Largest per-worker load.
    pub fn max_load(&self) -> u32 {
        self.loads().into_iter().max().unwrap_or(0)
    }

    /// Number of workers assigned to a slot.
    pub fn assigned_count(&self, slot: Slot) -> u32 {
        self.cells.iter().map(|r| r[slot.index()] as u32).sum()
    }

    /// Workers assigned to a slot, in roster order.
    pub fn workers_on(&self, slot: Slot) -> Vec<&str> {
        self.workers
            .iter()
            .zip(&self.cells)
            .filter(|(_, r)| r[slot.index()] == 1)
            .map(|(w, _)| w.as_str())
            .collect()
    }

    /// Total number of assignments.
    pub fn total_assigned(&self) -> u64 {
        self.loads().iter().map(|&l| u64::from(l)).sum()
    }
}

impl UnderstaffTable {
    /// Creates an all-zero series over the catalog.
    pub fn zeros() -> Self {
        Self {
            slots: ShiftCatalog::slots(),
            counts: vec![0; SLOT_COUNT],
        }
    }

    /// Shortfall of one slot.
    pub fn get(&self, slot: Slot) -> u32 {
        self.counts[slot.index()]
    }

    /// Total shortfall across the week.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// `(slot, shortfall)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, u32)> + '_ {
        self.slots.iter().copied().zip(self.counts.iter().copied())
    }
}

impl ScheduleSolution {
    /// Whether optimality was proven.
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}
