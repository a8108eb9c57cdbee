//! Worker availability.
//!
//! Availability is a (worker, slot) → bool mapping in which every pair is
//! available unless explicitly overridden. Only overrides are stored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Slot;

/// Sparse availability matrix with an "available" default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityMatrix {
    /// Explicit overrides: worker → slot → available.
    overrides: HashMap<String, HashMap<Slot, bool>>,
}

impl AvailabilityMatrix {
    /// Creates a matrix where every worker is available for every slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the availability of a worker for a slot.
    pub fn set(&mut self, worker: impl Into<String>, slot: Slot, available: bool) {
        self.overrides
            .entry(worker.into())
            .or_default()
            .insert(slot, available);
    }

    /// Marks a worker unavailable for a slot.
    pub fn set_unavailable(&mut self, worker: impl Into<String>, slot: Slot) {
        self.set(worker, slot, false);
    }

    /// Whether a worker is available for a slot (default `true`).
    pub fn is_available(&self, worker: &str, slot: Slot) -> bool {
        self.overrides
            .get(worker)
            .and_then(|slots| slots.get(&slot))
            .copied()
            .unwrap_or(true)
    }

    /// Workers that have at least one override.
    pub fn workers(&self) -> impl Iterator<Item = &str> {
        self.overrides.keys().map(String::as_str)
    }

    /// Number of (worker, slot) pairs explicitly marked unavailable.
    pub fn unavailable_count(&self) -> usize {
        self.overrides
            .values()
            .flat_map(|slots| slots.values())
            .filter(|&&available| !available)
            .count()
    }
}
