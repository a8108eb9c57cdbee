//! Bounded-time optimisation of a [`ShiftModel`].
//!
//! Runs Pumpkin's linear SAT-UNSAT search (find a solution, demand a
//! strictly better one, repeat) under a wall-clock budget and maps its
//! result onto [`SolveStatus`]:
//!
//! | Pumpkin | Status |
//! |---------|--------|
//! | `Optimal` | `Optimal` |
//! | `Satisfiable` (budget ran out) | `Feasible` |
//! | `Unsatisfiable` | `Infeasible` |
//! | `Unknown` | `Unknown` |

use std::fmt;
use std::time::{Duration, Instant};

use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution, SolutionReference};
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::Solver;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::builder::{ShiftModel, ShiftVars};

/// Final status of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SolveStatus {
    /// A solution was found and proven optimal.
    Optimal,
    /// A solution was found but the budget ran out before optimality was proven.
    Feasible,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The budget ran out with neither a solution nor a proof of infeasibility.
    Unknown,
}

impl SolveStatus {
    /// Whether the status carries a usable assignment.
    #[inline]
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolveStatus::Optimal => "OPTIMAL",
            SolveStatus::Feasible => "FEASIBLE",
            SolveStatus::Infeasible => "INFEASIBLE",
            SolveStatus::Unknown => "UNKNOWN",
        })
    }
}

/// Variable values of one solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// `x[w,s]`, worker-major.
    pub assign: Vec<bool>,
    /// `u[s]`, catalog order.
    pub understaff: Vec<u32>,
    /// `t`.
    pub ceiling: u32,
    /// Value of the objective variable.
    pub objective: i64,
}

impl Assignment {
    /// `Σ_s u[s]`.
    pub fn total_understaff(&self) -> u64 {
        self.understaff.iter().map(|&u| u64::from(u)).sum()
    }
}

/// Result of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    status: SolveStatus,
    assignment: Option<Assignment>,
    elapsed: Duration,
}

impl SolveOutcome {
    /// Pairs a status with its assignment. The assignment is dropped for
    /// statuses that carry none.
    pub fn new(status: SolveStatus, assignment: Option<Assignment>, elapsed: Duration) -> Self {
        Self {
            status,
            assignment: assignment.filter(|_| status.has_solution()),
            elapsed,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// The solution, for `Optimal` and `Feasible` outcomes.
    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    pub fn into_assignment(self) -> Option<Assignment> {
        self.assignment
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

fn on_incumbent<B>(_: &Solver, _: SolutionReference, _: &B) {
    debug!(event = "incumbent");
}

fn read_assignment(vars: &ShiftVars, objective: i64, solution: &impl ProblemSolution) -> Assignment {
    let count = |value: i32| u32::try_from(value.max(0)).unwrap_or(0);
    Assignment {
        assign: vars
            .assign
            .iter()
            .map(|&x| solution.get_integer_value(x) > 0)
            .collect(),
        understaff: vars
            .understaff
            .iter()
            .map(|&u| count(solution.get_integer_value(u)))
            .collect(),
        ceiling: count(solution.get_integer_value(vars.ceiling)),
        objective,
    }
}

/// Minimizes the attached objective within `time_budget`.
///
/// A model with no objective attached, or one whose constraints already
/// conflicted while posting, is not searched.
pub fn search(shift: &mut ShiftModel, time_budget: Duration) -> SolveOutcome {
    let start = Instant::now();
    let Some(objective) = shift.vars.objective else {
        warn!(event = "search_skipped", reason = "no objective attached");
        return SolveOutcome::new(SolveStatus::Unknown, None, start.elapsed());
    };
    if shift.has_root_conflict() {
        debug!(event = "root_conflict");
        return SolveOutcome::new(SolveStatus::Infeasible, None, start.elapsed());
    }

    let mut brancher = shift.solver.default_brancher();
    let mut termination = TimeBudget::starting_now(time_budget);
    let result = shift.solver.optimise(
        &mut brancher,
        &mut termination,
        LinearSatUnsat::new(OptimisationDirection::Minimise, objective, on_incumbent),
    );

    let vars = &shift.vars;
    let (status, assignment) = match result {
        OptimisationResult::Optimal(solution) => {
            let value = i64::from(solution.get_integer_value(objective));
            (
                SolveStatus::Optimal,
                Some(read_assignment(vars, value, &solution)),
            )
        }
        OptimisationResult::Satisfiable(solution) => {
            let value = i64::from(solution.get_integer_value(objective));
            (
                SolveStatus::Feasible,
                Some(read_assignment(vars, value, &solution)),
            )
        }
        OptimisationResult::Unsatisfiable => (SolveStatus::Infeasible, None),
        OptimisationResult::Unknown => (SolveStatus::Unknown, None),
    };

    let outcome = SolveOutcome::new(status, assignment, start.elapsed());
    debug!(
        event = "search_end",
        status = %outcome.status(),
        objective = outcome.assignment().map(|a| a.objective),
        elapsed_ms = outcome.elapsed().as_millis() as u64,
    );
    if !outcome.is_optimal() && outcome.status() != SolveStatus::Infeasible {
        warn!(
            event = "search_aborted",
            status = %outcome.status(),
            has_solution = outcome.status().has_solution(),
            budget_ms = time_budget.as_millis() as u64,
        );
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{attach_objective, ObjectiveWeights, ShiftCpBuilder};
    use crate::models::ScheduleRequest;

    fn assignment() -> Assignment {
        Assignment {
            assign: vec![true, false],
            understaff: vec![2, 0, 1],
            ceiling: 1,
            objective: 3010,
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolveStatus::Optimal.to_string(), "OPTIMAL");
        assert_eq!(SolveStatus::Unknown.to_string(), "UNKNOWN");
        assert!(SolveStatus::Feasible.has_solution());
        assert!(!SolveStatus::Infeasible.has_solution());
        assert!(!SolveStatus::Unknown.has_solution());
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&SolveStatus::Feasible).unwrap();
        assert_eq!(json, "\"Feasible\"");
    }

    #[test]
    fn test_outcome_drops_assignment_without_solution() {
        let o = SolveOutcome::new(SolveStatus::Unknown, Some(assignment()), Duration::ZERO);
        assert!(o.assignment().is_none());

        let o = SolveOutcome::new(SolveStatus::Feasible, Some(assignment()), Duration::ZERO);
        assert!(!o.is_optimal());
        assert_eq!(o.assignment().map(Assignment::total_understaff), Some(3));
        assert_eq!(o.into_assignment().unwrap().objective, 3010);
    }

    #[test]
    fn test_search_requires_objective() {
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(14)
            .with_uniform_need(1, 1);
        let mut shift = ShiftCpBuilder::new(&request).build();
        let outcome = search(&mut shift, Duration::from_secs(1));
        assert_eq!(outcome.status(), SolveStatus::Unknown);
        assert!(outcome.assignment().is_none());
    }

    #[test]
    fn test_search_single_worker_optimum() {
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(14)
            .with_uniform_need(1, 1);
        let mut shift = attach_objective(
            ShiftCpBuilder::new(&request).build(),
            ObjectiveWeights::default(),
        );
        let outcome = search(&mut shift, Duration::from_secs(10));
        assert_eq!(outcome.status(), SolveStatus::Optimal);
        let a = outcome.assignment().unwrap();
        assert!(a.assign.iter().all(|&x| x));
        assert_eq!(a.total_understaff(), 0);
        assert_eq!(a.ceiling, 14);
        assert_eq!(a.objective, 140);
    }

    #[test]
    fn test_search_proves_infeasibility() {
        // One shift of capacity against fourteen slots with no slack.
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(1)
            .with_uniform_need(1, 1);
        let mut shift = attach_objective(
            ShiftCpBuilder::new(&request)
                .with_understaff_upper_bound(Some(0))
                .build(),
            ObjectiveWeights::default(),
        );
        let outcome = search(&mut shift, Duration::from_secs(10));
        assert_eq!(outcome.status(), SolveStatus::Infeasible);
        assert!(outcome.assignment().is_none());
    }
}
