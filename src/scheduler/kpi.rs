//! Roster quality metrics (KPIs).
//!
//! Computes staffing indicators from a solved roster and the request it
//! was solved for.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Need | Σ need over all slots |
//! | Total Assigned | Number of (worker, slot) assignments |
//! | Total Understaff | Σ shortfall over all slots |
//! | Coverage Rate | Covered need / total need |
//! | Max / Min / Avg Load | Slots per worker |
//! | Load Spread | Max load − min load |
//! | Utilization | Load / capacity, per worker |
//!
//! # Reference
//! Ernst et al. (2004), "Staff scheduling and rostering", Sec. 3: Objectives

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{ScheduleRequest, ScheduleSolution, ShiftCatalog};

/// Roster performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Sum of all slot needs.
    pub total_need: u64,
    /// Number of assignments made.
    pub total_assigned: u64,
    /// Sum of per-slot shortfalls.
    pub total_understaff: u64,
    /// Fraction of need covered (0.0..1.0). 1.0 when nothing is needed.
    pub coverage_rate: f64,
    /// Busiest worker's slot count.
    pub max_load: u32,
    /// Least busy worker's slot count.
    pub min_load: u32,
    /// Mean slots per worker.
    pub avg_load: f64,
    /// `max_load - min_load`.
    pub load_spread: u32,
    /// Per-worker load / capacity. Zero-capacity workers report 0.0.
    pub utilization_by_worker: HashMap<String, f64>,
    /// Mean of per-worker utilization.
    pub avg_utilization: f64,
}

impl ScheduleKpi {
    /// Computes KPIs from a solution and its request.
    ///
    /// Assignments beyond a slot's need do not count toward coverage.
    pub fn calculate(solution: &ScheduleSolution, request: &ScheduleRequest) -> Self {
        let table = &solution.schedule;
        let total_need = request.total_need();

        let covered: u64 = ShiftCatalog::slots()
            .into_iter()
            .map(|slot| u64::from(table.assigned_count(slot).min(request.need_of(slot))))
            .sum();
        let coverage_rate = if total_need == 0 {
            1.0
        } else {
            covered as f64 / total_need as f64
        };

        let loads = table.loads();
        let max_load = loads.iter().copied().max().unwrap_or(0);
        let min_load = loads.iter().copied().min().unwrap_or(0);
        let avg_load = if loads.is_empty() {
            0.0
        } else {
            loads.iter().map(|&l| u64::from(l)).sum::<u64>() as f64 / loads.len() as f64
        };

        let utilization_by_worker: HashMap<String, f64> = table
            .workers
            .iter()
            .zip(&loads)
            .map(|(worker, &load)| {
                let capacity = request.capacity_of(worker);
                let utilization = if capacity == 0 {
                    0.0
                } else {
                    load as f64 / capacity as f64
                };
                (worker.clone(), utilization)
            })
            .collect();
        let avg_utilization = if utilization_by_worker.is_empty() {
            0.0
        } else {
            utilization_by_worker.values().sum::<f64>() / utilization_by_worker.len() as f64
        };

        Self {
            total_need,
            total_assigned: table.total_assigned(),
            total_understaff: solution.understaff.total(),
            coverage_rate,
            max_load,
            min_load,
            avg_load,
            load_spread: max_load - min_load,
            utilization_by_worker,
            avg_utilization,
        }
    }

    /// Whether the roster meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_coverage: f64, max_spread: u32) -> bool {
        self.coverage_rate >= min_coverage && self.load_spread <= max_spread
    }
}
