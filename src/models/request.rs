//! Rostering request.
//!
//! The complete input to one solve: the worker roster, each worker's
//! capacity (maximum slots per week), the staffing need of every catalog
//! slot, and availability overrides. Requests are plain data; they are
//! validated by [`crate::validation::validate_request`] before a model is
//! built from them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{AvailabilityMatrix, Period, ShiftCatalog, Slot};

/// Input container for one rostering solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Worker identifiers, in output row order.
    pub workers: Vec<String>,
    /// Maximum number of slots each worker may take (0..=14).
    pub capacities: HashMap<String, u32>,
    /// Required worker count per slot. Must cover all catalog slots.
    pub need: HashMap<Slot, u32>,
    /// Availability overrides (default: available).
    #[serde(default)]
    pub availability: AvailabilityMatrix,
}

impl ScheduleRequest {
    /// Creates a request for the given roster with no capacities or needs.
    pub fn new<I, S>(workers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            workers: workers.into_iter().map(Into::into).collect(),
            capacities: HashMap::new(),
            need: HashMap::new(),
            availability: AvailabilityMatrix::new(),
        }
    }

    /// Creates a request for workers named `E1..=En`.
    pub fn roster(n: usize) -> Self {
        Self::new((1..=n).map(|i| format!("E{i}")))
    }

    /// Sets one worker's capacity.
    pub fn with_capacity(mut self, worker: impl Into<String>, max_slots: u32) -> Self {
        self.capacities.insert(worker.into(), max_slots);
        self
    }

    /// Sets the same capacity for every worker on the roster.
    pub fn with_default_capacity(mut self, max_slots: u32) -> Self {
        for w in &self.workers {
            self.capacities.insert(w.clone(), max_slots);
        }
        self
    }

    /// Sets the need of one slot.
    pub fn with_need(mut self, slot: Slot, workers_needed: u32) -> Self {
        self.need.insert(slot, workers_needed);
        self
    }

    /// Sets every slot's need by period type.
    pub fn with_uniform_need(mut self, morning: u32, evening: u32) -> Self {
        for slot in ShiftCatalog::slots() {
            let n = match slot.period {
                Period::Morning => morning,
                Period::Evening => evening,
            };
            self.need.insert(slot, n);
        }
        self
    }

    /// Marks a worker unavailable for a slot.
    pub fn with_unavailable(mut self, worker: impl Into<String>, slot: Slot) -> Self {
        self.availability.set_unavailable(worker, slot);
        self
    }

    /// Sets an explicit availability override.
    pub fn with_availability(mut self, worker: impl Into<String>, slot: Slot, available: bool) -> Self {
        self.availability.set(worker, slot, available);
        self
    }

    /// Need of a slot (0 if unspecified).
    pub fn need_of(&self, slot: Slot) -> u32 {
        self.need.get(&slot).copied().unwrap_or(0)
    }

    /// Capacity of a worker (0 if unspecified).
    pub fn capacity_of(&self, worker: &str) -> u32 {
        self.capacities.get(worker).copied().unwrap_or(0)
    }

    /// Sum of all slot needs.
    pub fn total_need(&self) -> u64 {
        self.need.values().map(|&n| u64::from(n)).sum()
    }

    /// Sum of all worker capacities.
    pub fn total_capacity(&self) -> u64 {
        self.workers.iter().map(|w| u64::from(self.capacity_of(w))).sum()
    }
}
