//! CP formulation of weekly rostering.
//!
//! Builds the rostering model on the Pumpkin constraint solver and runs
//! it under a time budget. The pipeline runs in four steps. Each step
//! takes the model by value (or exclusively) and hands it on:
//!
//! 1. [`ShiftCpBuilder`] builds variables and hard constraints from a
//!    [`ScheduleRequest`].
//! 2. [`attach_objective`] adds the weighted shortfall + fairness objective.
//! 3. [`search`] optimises within the time budget.
//! 4. [`extract`] decodes the values into result tables.
//!
//! [`solve_schedule`] wires the steps together behind input validation.
//!
//! # Reference
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Van den Bergh et al. (2013), "Personnel scheduling: A literature review"

pub mod builder;
pub mod extract;
pub mod objective;
pub mod search;

use std::time::Instant;

use tracing::{info, warn};

pub use builder::{
    ConstraintKind, PostedConstraint, Relation, ShiftCpBuilder, ShiftModel, ShiftVars,
};
pub use extract::{decode, extract};
pub use objective::{attach_objective, ObjectiveWeights};
pub use search::{search, Assignment, SolveOutcome, SolveStatus};

use crate::config::{ObjectiveMode, SolverConfig};
use crate::error::Result;
use crate::models::{ScheduleRequest, ScheduleSolution};
use crate::validation::{unrostered_workers, validate_request};

/// Solves a rostering request.
///
/// Returns `Ok(None)` when the search ends infeasible or without any
/// solution inside the time budget. Malformed requests and inconsistent
/// configurations are rejected before a model is built.
///
/// # Example
/// ```
/// use u_shift::{solve_schedule, ScheduleRequest, SolverConfig};
///
/// let request = ScheduleRequest::roster(4)
///     .with_default_capacity(5)
///     .with_uniform_need(1, 1);
/// let solution = solve_schedule(&request, &SolverConfig::default())
///     .unwrap()
///     .expect("always feasible with default bounds");
///
/// assert_eq!(solution.understaff.total(), 0);
/// assert_eq!(solution.fairness, 4);
/// ```
pub fn solve_schedule(
    request: &ScheduleRequest,
    config: &SolverConfig,
) -> Result<Option<ScheduleSolution>> {
    config.validate()?;
    validate_request(request)?;

    let strangers = unrostered_workers(request);
    if !strangers.is_empty() {
        warn!(event = "unrostered_entries", workers = ?strangers);
    }

    let start = Instant::now();
    info!(
        event = "solve_start",
        workers = request.workers.len(),
        total_need = request.total_need(),
        total_capacity = request.total_capacity(),
        unavailable = request.availability.unavailable_count(),
        mode = ?config.objective_mode,
        time_limit_s = config.time_limit_seconds,
    );

    let solution = match config.objective_mode {
        ObjectiveMode::Weighted => solve_weighted(request, config),
        ObjectiveMode::Lexicographic => solve_lexicographic(request, config, start),
    };

    match &solution {
        Some(s) => info!(
            event = "solve_end",
            status = %s.status,
            objective = s.objective,
            understaff = s.understaff.total(),
            fairness = s.fairness,
            elapsed_ms = start.elapsed().as_millis() as u64,
        ),
        None => info!(
            event = "solve_end",
            status = "no_solution",
            elapsed_ms = start.elapsed().as_millis() as u64,
        ),
    }
    Ok(solution)
}

fn builder<'a>(request: &'a ScheduleRequest, config: &SolverConfig) -> ShiftCpBuilder<'a> {
    ShiftCpBuilder::new(request).with_understaff_upper_bound(config.understaff_upper_bound)
}

fn solve_weighted(request: &ScheduleRequest, config: &SolverConfig) -> Option<ScheduleSolution> {
    let mut shift = attach_objective(
        builder(request, config).build(),
        ObjectiveWeights::from_config(config),
    );
    let outcome = search(&mut shift, config.time_limit());
    extract(&shift, &outcome)
}

/// Minimizes total shortfall, holds it with a cap, then minimizes the ceiling.
fn solve_lexicographic(
    request: &ScheduleRequest,
    config: &SolverConfig,
    start: Instant,
) -> Option<ScheduleSolution> {
    let weights = ObjectiveWeights::from_config(config);

    let mut coverage = attach_objective(
        builder(request, config).build(),
        ObjectiveWeights::coverage_only(),
    );
    let first = search(&mut coverage, config.time_limit());
    let first_status = first.status();
    let first = first.into_assignment()?;
    let best_understaff = u32::try_from(first.total_understaff()).unwrap_or(u32::MAX);

    let mut fairness = attach_objective(
        builder(request, config)
            .with_understaff_cap(Some(best_understaff))
            .build(),
        ObjectiveWeights::fairness_only(),
    );
    let budget = config.time_limit().saturating_sub(start.elapsed());
    let second = search(&mut fairness, budget);

    let (assignment, status) = match second.assignment() {
        Some(found) => {
            let status = if first_status == SolveStatus::Optimal && second.is_optimal() {
                SolveStatus::Optimal
            } else {
                SolveStatus::Feasible
            };
            (found.clone(), status)
        }
        None => (first, SolveStatus::Feasible),
    };

    let total = i64::try_from(assignment.total_understaff()).unwrap_or(i64::MAX);
    let mut solution = decode(fairness.workers(), &assignment, status);
    solution.objective = weights.cost(total, i64::from(assignment.ceiling));
    Some(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::models::{Day, Period, ShiftCatalog, Slot, SLOT_COUNT};
    use crate::validation::{ValidationErrorKind, MAX_NEED};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn config() -> SolverConfig {
        SolverConfig::default().with_time_limit_seconds(10)
    }

    fn solved(request: &ScheduleRequest) -> ScheduleSolution {
        solve_schedule(request, &config())
            .unwrap()
            .expect("solution expected")
    }

    fn random_request(rng: &mut StdRng) -> ScheduleRequest {
        let n = rng.random_range(1..=6);
        let mut request = ScheduleRequest::roster(n);
        for w in 1..=n {
            request = request.with_capacity(format!("E{w}"), rng.random_range(0..=14));
        }
        for slot in ShiftCatalog::slots() {
            request = request.with_need(slot, rng.random_range(0..=3));
        }
        for w in 1..=n {
            for slot in ShiftCatalog::slots() {
                if rng.random_bool(0.2) {
                    request = request.with_unavailable(format!("E{w}"), slot);
                }
            }
        }
        request
    }

    /// Hard-constraint and fairness checks on a returned solution.
    fn assert_valid(request: &ScheduleRequest, sol: &ScheduleSolution) {
        let table = &sol.schedule;
        assert_eq!(table.workers, request.workers);
        assert_eq!(table.slots, ShiftCatalog::slots());

        for worker in &request.workers {
            for slot in ShiftCatalog::slots() {
                if !request.availability.is_available(worker, slot) {
                    assert!(!table.is_assigned(worker, slot), "{worker} on {slot}");
                }
            }
            assert!(table.load(worker) <= request.capacity_of(worker));
        }
        for slot in ShiftCatalog::slots() {
            assert!(table.assigned_count(slot) + sol.understaff.get(slot) >= request.need_of(slot));
        }
        assert!(sol.fairness >= table.max_load());
        if sol.is_optimal() {
            assert_eq!(sol.fairness, table.max_load());
        }
    }

    #[test]
    fn test_scenario_single_full_time_worker() {
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(14)
            .with_uniform_need(1, 1);
        let sol = solved(&request);
        assert_eq!(sol.status, SolveStatus::Optimal);
        assert_eq!(sol.schedule.load("E1"), 14);
        assert_eq!(sol.understaff.total(), 0);
        assert_eq!(sol.fairness, 14);
        assert_eq!(sol.objective, 140);
    }

    #[test]
    fn test_scenario_two_single_shift_workers() {
        let request = ScheduleRequest::roster(2)
            .with_default_capacity(1)
            .with_uniform_need(1, 1);
        let sol = solved(&request);
        assert!(sol.schedule.total_assigned() <= 2);
        assert_eq!(sol.understaff.total(), 12);
        assert_eq!(sol.fairness, 1);
        assert_valid(&request, &sol);
    }

    #[test]
    fn test_scenario_unavailable_sole_worker() {
        let slot = Slot::new(Day::Thu, Period::Evening);
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(14)
            .with_uniform_need(1, 1)
            .with_unavailable("E1", slot);
        let sol = solved(&request);
        assert_eq!(sol.understaff.get(slot), 1);
        assert_eq!(sol.understaff.total(), 1);
        assert!(!sol.schedule.is_assigned("E1", slot));
        assert_eq!(sol.fairness, 13);
    }

    #[test]
    fn test_scenario_zero_need_slot() {
        let busy = Slot::new(Day::Mon, Period::Morning);
        let mut request = ScheduleRequest::roster(1).with_default_capacity(14);
        for slot in ShiftCatalog::slots() {
            request = request.with_need(slot, u32::from(slot == busy));
        }
        let sol = solved(&request);
        for slot in ShiftCatalog::slots().into_iter().filter(|&s| s != busy) {
            assert_eq!(sol.understaff.get(slot), 0);
            assert_eq!(sol.schedule.assigned_count(slot), 0);
        }
        assert!(sol.schedule.is_assigned("E1", busy));
        assert_eq!(sol.objective, 10);
    }

    #[test]
    fn test_random_instances_respect_hard_constraints() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..25 {
            let request = random_request(&mut rng);
            let sol = solved(&request);
            assert_eq!(sol.status, SolveStatus::Optimal);
            assert_valid(&request, &sol);
        }
    }

    #[test]
    fn test_capacity_increase_never_adds_understaff() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..15 {
            let request = random_request(&mut rng);
            let before = solved(&request).understaff.total();

            let worker = request.workers[rng.random_range(0..request.workers.len())].clone();
            let raised = (request.capacity_of(&worker) + 1).min(SLOT_COUNT as u32);
            let after = solved(&request.clone().with_capacity(worker, raised))
                .understaff
                .total();
            assert!(after <= before, "understaff rose from {before} to {after}");
        }
    }

    #[test]
    fn test_repeated_solves_agree() {
        let mut rng = StdRng::seed_from_u64(3);
        let request = random_request(&mut rng);
        let a = solved(&request);
        let b = solved(&request);
        assert_eq!(a.objective, b.objective);
        assert_eq!(a.understaff.total(), b.understaff.total());
        assert_eq!(a.fairness, b.fairness);
    }

    #[test]
    fn test_lexicographic_matches_weighted() {
        let mut rng = StdRng::seed_from_u64(19);
        let lex = config().with_objective_mode(ObjectiveMode::Lexicographic);
        for _ in 0..10 {
            let request = random_request(&mut rng);
            let weighted = solved(&request);
            let lexi = solve_schedule(&request, &lex).unwrap().unwrap();
            assert_eq!(lexi.status, SolveStatus::Optimal);
            assert_eq!(lexi.understaff.total(), weighted.understaff.total());
            assert_eq!(lexi.fairness, weighted.fairness);
            assert_eq!(lexi.objective, weighted.objective);
            assert_valid(&request, &lexi);
        }
    }

    #[test]
    fn test_lexicographic_two_full_time_workers() {
        let request = ScheduleRequest::roster(2)
            .with_default_capacity(14)
            .with_uniform_need(1, 1);
        let cfg = config().with_objective_mode(ObjectiveMode::Lexicographic);
        let sol = solve_schedule(&request, &cfg).unwrap().unwrap();
        assert_eq!(sol.understaff.total(), 0);
        assert_eq!(sol.fairness, 7);
        assert_eq!(sol.objective, 70);
    }

    #[test]
    fn test_tight_understaff_bound_is_infeasible() {
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(3)
            .with_uniform_need(1, 1);
        let cfg = config().with_understaff_upper_bound(0);
        assert!(solve_schedule(&request, &cfg).unwrap().is_none());

        let roomy = config().with_understaff_upper_bound(1);
        let sol = solve_schedule(&request, &roomy).unwrap().unwrap();
        assert_eq!(sol.understaff.total(), 11);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let err = solve_schedule(&ScheduleRequest::default(), &config()).unwrap_err();
        match err {
            ScheduleError::InvalidInput(errors) => {
                assert!(errors
                    .errors()
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::EmptyRoster));
            }
            other => panic!("unexpected error: {other}"),
        }

        let over = ScheduleRequest::roster(1)
            .with_default_capacity(15)
            .with_uniform_need(1, 1);
        assert!(matches!(
            solve_schedule(&over, &config()),
            Err(ScheduleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(1)
            .with_uniform_need(1, 1);
        let cfg = config().with_weights(100, 10);
        assert!(matches!(
            solve_schedule(&request, &cfg),
            Err(ScheduleError::Config(_))
        ));
    }

    #[test]
    fn test_need_beyond_limit_rejected() {
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(14)
            .with_uniform_need(400_000_000, 400_000_000);
        match solve_schedule(&request, &config()) {
            Err(ScheduleError::InvalidInput(errors)) => {
                assert_eq!(errors.errors().len(), SLOT_COUNT);
                assert!(errors
                    .errors()
                    .iter()
                    .all(|e| e.kind == ValidationErrorKind::NeedOutOfRange));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_largest_accepted_inputs_do_not_overflow() {
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(14)
            .with_uniform_need(MAX_NEED, MAX_NEED);
        let cfg = config().with_weights(crate::config::MAX_UNDERSTAFF_WEIGHT, 10);
        let sol = solve_schedule(&request, &cfg).unwrap().unwrap();

        let shortfall = u64::from(MAX_NEED) * SLOT_COUNT as u64 - 14;
        assert_eq!(sol.understaff.total(), shortfall);
        assert_eq!(sol.fairness, 14);
        assert_eq!(sol.objective, 10_000 * shortfall as i64 + 140);
        assert_eq!(request.total_need(), u64::from(MAX_NEED) * SLOT_COUNT as u64);
    }

    #[test]
    fn test_unrostered_entries_are_ignored() {
        let request = ScheduleRequest::roster(1)
            .with_default_capacity(14)
            .with_uniform_need(1, 1)
            .with_capacity("Ghost", 3)
            .with_unavailable("Ghost", Slot::new(Day::Mon, Period::Morning));
        let sol = solved(&request);
        assert_eq!(sol.schedule.workers, vec!["E1".to_string()]);
        assert_eq!(sol.understaff.total(), 0);
        assert_eq!(sol.objective, 140);
    }

    #[test]
    fn test_zero_fairness_weight_still_covers() {
        let request = ScheduleRequest::roster(3)
            .with_default_capacity(5)
            .with_uniform_need(1, 1);
        let sol = solve_schedule(&request, &config().with_weights(1000, 0))
            .unwrap()
            .unwrap();
        assert_eq!(sol.understaff.total(), 0);
        assert_eq!(sol.objective, 0);
        assert!(sol.fairness >= sol.schedule.max_load());
    }
}
