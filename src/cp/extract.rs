//! Decoding solver values into result tables.

use super::builder::ShiftModel;
use super::search::{Assignment, SolveOutcome, SolveStatus};
use crate::models::{ScheduleSolution, ScheduleTable, UnderstaffTable, SLOT_COUNT};

/// Decodes a search outcome.
///
/// Returns `None` unless the outcome is `Optimal` or `Feasible`; an
/// infeasible or unknown run carries no values to read.
pub fn extract(shift: &ShiftModel, outcome: &SolveOutcome) -> Option<ScheduleSolution> {
    if !outcome.status().has_solution() {
        return None;
    }
    let assignment = outcome.assignment()?;
    Some(decode(shift.workers(), assignment, outcome.status()))
}

/// Builds the result tables from a full assignment.
pub fn decode(workers: &[String], assignment: &Assignment, status: SolveStatus) -> ScheduleSolution {
    let mut schedule = ScheduleTable::empty(workers.to_vec());
    for (w, row) in schedule.cells.iter_mut().enumerate() {
        for (s, cell) in row.iter_mut().enumerate() {
            let worked = assignment
                .assign
                .get(w * SLOT_COUNT + s)
                .copied()
                .unwrap_or(false);
            *cell = u8::from(worked);
        }
    }

    let mut understaff = UnderstaffTable::zeros();
    for (count, &u) in understaff.counts.iter_mut().zip(&assignment.understaff) {
        *count = u;
    }

    ScheduleSolution {
        status,
        objective: assignment.objective,
        schedule,
        understaff,
        fairness: assignment.ceiling,
    }
}
