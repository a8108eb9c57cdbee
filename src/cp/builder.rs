//! Rostering model construction.
//!
//! Translates a [`ScheduleRequest`] into a Pumpkin constraint model:
//!
//! | Variable | Domain | Meaning |
//! |----------|--------|---------|
//! | `x[w,s]` | {0,1} | worker `w` works slot `s` |
//! | `u[s]` | [0, need(s)] | shortfall on slot `s` |
//! | `U` | [0, Σ need] | total shortfall, `Σ_s u[s]` |
//! | `t` | [0, 14] | fairness ceiling |
//!
//! Constraints:
//! - Coverage: `Σ_w x[w,s] + u[s] ≥ need(s)`
//! - Availability: `x[w,s] = 0` where the worker is unavailable
//! - Capacity: `Σ_s x[w,s] ≤ capacity(w)`
//! - Fairness: `Σ_s x[w,s] − t ≤ 0`
//! - Aggregates: `Σ x + U ≥ Σ need` and `Σ x − n·t ≤ 0`
//!
//! The two aggregates are implied by the rows above. Posting them lets
//! bound propagation see the roster-wide counting argument directly, which
//! is what proves most optima.
//!
//! # Reference
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

use std::fmt;

use pumpkin_solver::constraints;
use pumpkin_solver::variables::{DomainId, TransformableVariable};
use pumpkin_solver::Solver;

use super::objective::ObjectiveWeights;
use crate::models::{ScheduleRequest, ShiftCatalog, Slot, SLOT_COUNT};

/// Family a posted constraint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Coverage,
    Availability,
    Capacity,
    Fairness,
    /// `Σ u[s] − U = 0`.
    UnderstaffTotal,
    /// Roster-wide implied rows.
    Aggregate,
    /// `U ≤ cap`, holding coverage during a second lexicographic pass.
    UnderstaffCap,
    /// Links the objective variable to its terms.
    Objective,
}

/// Comparison of a linear row against its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

/// Record of one constraint handed to the solver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedConstraint {
    pub kind: ConstraintKind,
    pub label: String,
    pub relation: Relation,
    /// Number of non-zero terms.
    pub arity: usize,
    pub rhs: i32,
}

impl fmt::Display for PostedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.relation {
            Relation::Le => "<=",
            Relation::Ge => ">=",
            Relation::Eq => "==",
        };
        write!(f, "{}: {} terms {} {}", self.label, self.arity, op, self.rhs)
    }
}

/// Builds a [`ShiftModel`] from a validated request.
///
/// # Example
/// ```
/// use u_shift::cp::{ConstraintKind, ShiftCpBuilder};
/// use u_shift::models::ScheduleRequest;
///
/// let request = ScheduleRequest::roster(3)
///     .with_default_capacity(5)
///     .with_uniform_need(1, 1);
/// let shift = ShiftCpBuilder::new(&request).build();
///
/// assert_eq!(shift.worker_count(), 3);
/// assert_eq!(shift.constraints_of(ConstraintKind::Coverage).count(), 14);
/// assert!(!shift.has_root_conflict());
/// ```
#[derive(Debug, Clone)]
pub struct ShiftCpBuilder<'a> {
    request: &'a ScheduleRequest,
    understaff_upper_bound: Option<u32>,
    understaff_cap: Option<u32>,
}

impl<'a> ShiftCpBuilder<'a> {
    /// Creates a builder for a request.
    pub fn new(request: &'a ScheduleRequest) -> Self {
        Self {
            request,
            understaff_upper_bound: None,
            understaff_cap: None,
        }
    }

    /// Caps every slot's shortfall at `bound` instead of its own need.
    ///
    /// A bound below some slot's unreachable demand makes the model infeasible.
    pub fn with_understaff_upper_bound(mut self, bound: Option<u32>) -> Self {
        self.understaff_upper_bound = bound;
        self
    }

    /// Adds `U ≤ cap`.
    pub fn with_understaff_cap(mut self, cap: Option<u32>) -> Self {
        self.understaff_cap = cap;
        self
    }

    /// Builds the model. No objective is attached yet.
    pub fn build(&self) -> ShiftModel {
        let request = self.request;
        let slots = ShiftCatalog::slots();
        let workers = request.workers.clone();
        let mut solver = Solver::default();

        let mut assign = Vec::with_capacity(workers.len() * SLOT_COUNT);
        let mut available = Vec::with_capacity(workers.len() * SLOT_COUNT);
        for worker in &workers {
            for &slot in &slots {
                assign.push(solver.new_bounded_integer(0, 1));
                available.push(request.availability.is_available(worker, slot));
            }
        }

        let needs: Vec<i32> = slots.iter().map(|&s| to_domain(request.need_of(s))).collect();
        let understaff_hi: Vec<i32> = needs
            .iter()
            .map(|&need| {
                self.understaff_upper_bound
                    .map_or(need, |bound| to_domain(bound).min(need))
            })
            .collect();
        let understaff: Vec<DomainId> = understaff_hi
            .iter()
            .map(|&hi| solver.new_bounded_integer(0, hi))
            .collect();
        let total_hi = understaff_hi.iter().fold(0i32, |acc, &hi| acc.saturating_add(hi));
        let total_understaff = solver.new_bounded_integer(0, total_hi);
        let ceiling = solver.new_bounded_integer(0, SLOT_COUNT as i32);

        let capacities: Vec<i32> = workers
            .iter()
            .map(|w| to_domain(request.capacity_of(w)))
            .collect();

        let mut shift = ShiftModel {
            solver,
            vars: ShiftVars {
                assign,
                understaff,
                total_understaff,
                ceiling,
                objective: None,
            },
            workers,
            slots,
            available,
            needs,
            capacities,
            understaff_hi,
            weights: None,
            understaff_cap: None,
            constraints: Vec::new(),
            root_conflict: false,
        };
        shift.post_rows();
        if let Some(cap) = self.understaff_cap {
            shift.post_understaff_cap(cap);
        }
        shift
    }
}

/// Solver handles of every decision variable.
#[derive(Debug, Clone)]
pub struct ShiftVars {
    /// `x[w,s]`, worker-major.
    pub assign: Vec<DomainId>,
    /// `u[s]`, catalog order.
    pub understaff: Vec<DomainId>,
    /// `U`.
    pub total_understaff: DomainId,
    /// `t`.
    pub ceiling: DomainId,
    /// Objective variable once one is attached.
    pub objective: Option<DomainId>,
}

/// A built rostering model: the solver, its variable layout, and a log of
/// posted constraints.
///
/// Passed by value through the pipeline: builder, then
/// [`attach_objective`](super::attach_objective), then the search.
pub struct ShiftModel {
    pub(crate) solver: Solver,
    pub(crate) vars: ShiftVars,
    workers: Vec<String>,
    slots: Vec<Slot>,
    available: Vec<bool>,
    needs: Vec<i32>,
    capacities: Vec<i32>,
    understaff_hi: Vec<i32>,
    pub(crate) weights: Option<ObjectiveWeights>,
    understaff_cap: Option<u32>,
    constraints: Vec<PostedConstraint>,
    root_conflict: bool,
}

impl fmt::Debug for ShiftModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShiftModel")
            .field("workers", &self.workers)
            .field("constraints", &self.constraints.len())
            .field("weights", &self.weights)
            .field("understaff_cap", &self.understaff_cap)
            .field("root_conflict", &self.root_conflict)
            .finish()
    }
}

impl ShiftModel {
    fn post_rows(&mut self) {
        let n = self.workers.len();
        let slots = self.slots.clone();
        let workers = self.workers.clone();

        for (s, slot) in slots.iter().enumerate() {
            let mut terms: Vec<(DomainId, i32)> =
                (0..n).map(|w| (self.vars.assign[w * SLOT_COUNT + s], 1)).collect();
            terms.push((self.vars.understaff[s], 1));
            self.post(
                ConstraintKind::Coverage,
                format!("coverage[{slot}]"),
                Relation::Ge,
                &terms,
                self.needs[s],
            );
        }

        for (w, worker) in workers.iter().enumerate() {
            for (s, slot) in slots.iter().enumerate() {
                if !self.available[w * SLOT_COUNT + s] {
                    self.post(
                        ConstraintKind::Availability,
                        format!("unavailable[{worker},{slot}]"),
                        Relation::Eq,
                        &[(self.vars.assign[w * SLOT_COUNT + s], 1)],
                        0,
                    );
                }
            }
        }

        for (w, worker) in workers.iter().enumerate() {
            let mut row: Vec<(DomainId, i32)> = self.vars.assign[w * SLOT_COUNT..(w + 1) * SLOT_COUNT]
                .iter()
                .map(|&x| (x, 1))
                .collect();
            self.post(
                ConstraintKind::Capacity,
                format!("capacity[{worker}]"),
                Relation::Le,
                &row,
                self.capacities[w],
            );
            row.push((self.vars.ceiling, -1));
            self.post(
                ConstraintKind::Fairness,
                format!("fairness[{worker}]"),
                Relation::Le,
                &row,
                0,
            );
        }

        let mut total: Vec<(DomainId, i32)> =
            self.vars.understaff.iter().map(|&u| (u, 1)).collect();
        total.push((self.vars.total_understaff, -1));
        self.post(
            ConstraintKind::UnderstaffTotal,
            "understaff-total".to_string(),
            Relation::Eq,
            &total,
            0,
        );

        let all_x: Vec<(DomainId, i32)> = self.vars.assign.iter().map(|&x| (x, 1)).collect();
        let total_need = self.needs.iter().fold(0i32, |acc, &n| acc.saturating_add(n));

        let mut covered = all_x.clone();
        covered.push((self.vars.total_understaff, 1));
        self.post(
            ConstraintKind::Aggregate,
            "coverage-total".to_string(),
            Relation::Ge,
            &covered,
            total_need,
        );

        let mut load = all_x;
        load.push((self.vars.ceiling, -(n as i32)));
        self.post(
            ConstraintKind::Aggregate,
            "load-total".to_string(),
            Relation::Le,
            &load,
            0,
        );
    }

    fn post_understaff_cap(&mut self, cap: u32) {
        self.post(
            ConstraintKind::UnderstaffCap,
            "understaff-cap".to_string(),
            Relation::Le,
            &[(self.vars.total_understaff, 1)],
            to_domain(cap),
        );
        self.understaff_cap = Some(cap);
    }

    /// Posts `Σ coef·var (relation) rhs`.
    ///
    /// Zero coefficients are dropped. A root-level conflict marks the
    /// model infeasible; later posts are still recorded.
    pub(crate) fn post(
        &mut self,
        kind: ConstraintKind,
        label: String,
        relation: Relation,
        terms: &[(DomainId, i32)],
        rhs: i32,
    ) {
        let scaled: Vec<_> = terms
            .iter()
            .filter(|(_, coef)| *coef != 0)
            .map(|&(var, coef)| var.scaled(coef))
            .collect();
        let arity = scaled.len();
        let tag = self.solver.new_constraint_tag();
        let posted = match relation {
            Relation::Le => self
                .solver
                .add_constraint(constraints::less_than_or_equals(scaled, rhs, tag))
                .post(),
            Relation::Ge => self
                .solver
                .add_constraint(constraints::greater_than_or_equals(scaled, rhs, tag))
                .post(),
            Relation::Eq => self
                .solver
                .add_constraint(constraints::equals(scaled, rhs, tag))
                .post(),
        };
        if posted.is_err() {
            self.root_conflict = true;
        }
        self.constraints.push(PostedConstraint {
            kind,
            label,
            relation,
            arity,
            rhs,
        });
    }

    /// Creates a fresh solver variable.
    pub(crate) fn new_variable(&mut self, lo: i32, hi: i32) -> DomainId {
        self.solver.new_bounded_integer(lo, hi)
    }

    /// Variable handles.
    pub fn vars(&self) -> &ShiftVars {
        &self.vars
    }

    /// Roster, in row order.
    pub fn workers(&self) -> &[String] {
        &self.workers
    }

    /// Catalog slots, in column order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    #[inline]
    pub fn is_available(&self, worker: usize, slot: usize) -> bool {
        self.available[worker * SLOT_COUNT + slot]
    }

    #[inline]
    pub fn need(&self, slot: usize) -> i32 {
        self.needs[slot]
    }

    #[inline]
    pub fn capacity(&self, worker: usize) -> i32 {
        self.capacities[worker]
    }

    /// Upper bound of `u[s]`.
    #[inline]
    pub fn understaff_upper(&self, slot: usize) -> i32 {
        self.understaff_hi[slot]
    }

    /// Upper bound of `U`.
    pub fn total_understaff_upper(&self) -> i32 {
        self.understaff_hi
            .iter()
            .fold(0i32, |acc, &hi| acc.saturating_add(hi))
    }

    /// Weights of the attached objective, if any.
    pub fn weights(&self) -> Option<ObjectiveWeights> {
        self.weights
    }

    /// Cap on total shortfall, if one was added.
    pub fn understaff_cap(&self) -> Option<u32> {
        self.understaff_cap
    }

    /// Every posted constraint, in posting order.
    pub fn constraints(&self) -> &[PostedConstraint] {
        &self.constraints
    }

    /// Posted constraints of one family.
    pub fn constraints_of(&self, kind: ConstraintKind) -> impl Iterator<Item = &PostedConstraint> {
        self.constraints.iter().filter(move |c| c.kind == kind)
    }

    /// Whether posting already proved the model infeasible.
    pub fn has_root_conflict(&self) -> bool {
        self.root_conflict
    }
}

/// Clamps a count into the solver's 32-bit domain.
#[inline]
pub(crate) fn to_domain(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
