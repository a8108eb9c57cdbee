//! Objective formulation.
//!
//! `minimize understaff·U + fairness·t`, where `U = Σ_s u[s]`.
//!
//! The solver minimizes a single variable, so the weighted sum is pinned
//! to a fresh objective variable with an equality row.
//!
//! Coverage comes first: with `understaff > fairness × 14` a single unit of
//! shortfall always costs more than the whole fairness range, so fairness
//! only separates schedules that already minimize shortfall.

use serde::{Deserialize, Serialize};

use super::builder::{ConstraintKind, Relation, ShiftModel};
use crate::config::SolverConfig;
use crate::models::SLOT_COUNT;

/// Objective coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Cost per unit of shortfall.
    pub understaff: i64,
    /// Cost per unit of the fairness ceiling.
    pub fairness: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            understaff: 1000,
            fairness: 10,
        }
    }
}

impl ObjectiveWeights {
    pub fn new(understaff: i64, fairness: i64) -> Self {
        Self {
            understaff,
            fairness,
        }
    }

    /// Shortfall only (first lexicographic pass).
    pub fn coverage_only() -> Self {
        Self::new(1, 0)
    }

    /// Ceiling only (second lexicographic pass).
    pub fn fairness_only() -> Self {
        Self::new(0, 1)
    }

    /// Weights configured in `config`.
    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.understaff_weight, config.fairness_weight)
    }

    /// Whether coverage strictly dominates the full fairness range.
    pub fn preserves_priority(&self) -> bool {
        self.understaff > self.fairness.saturating_mul(SLOT_COUNT as i64)
    }

    /// Objective value for a shortfall total and a ceiling. Saturates
    /// instead of wrapping.
    pub fn cost(&self, total_understaff: i64, ceiling: i64) -> i64 {
        self.understaff
            .saturating_mul(total_understaff)
            .saturating_add(self.fairness.saturating_mul(ceiling))
    }

    fn coefficient(weight: i64) -> i32 {
        i32::try_from(weight).unwrap_or(i32::MAX)
    }
}

/// Attaches `weights` as the model's objective.
///
/// Each call adds a new objective variable; the last one attached is the
/// one minimized.
pub fn attach_objective(mut shift: ShiftModel, weights: ObjectiveWeights) -> ShiftModel {
    let upper = weights.cost(
        i64::from(shift.total_understaff_upper()),
        SLOT_COUNT as i64,
    );
    let objective = shift.new_variable(0, i32::try_from(upper).unwrap_or(i32::MAX));
    let terms = [
        (
            shift.vars.total_understaff,
            ObjectiveWeights::coefficient(weights.understaff),
        ),
        (
            shift.vars.ceiling,
            ObjectiveWeights::coefficient(weights.fairness),
        ),
        (objective, -1),
    ];
    shift.post(
        ConstraintKind::Objective,
        "objective".to_string(),
        Relation::Eq,
        &terms,
        0,
    );
    shift.vars.objective = Some(objective);
    shift.weights = Some(weights);
    shift
}
