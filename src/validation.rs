//! Input validation for rostering requests.
//!
//! Checks structural integrity of a request before a model is built.
//! Detects:
//! - An empty roster
//! - Duplicate worker IDs
//! - Missing or out-of-range capacities
//! - Catalog slots with no declared need, or a need above [`MAX_NEED`]
//!
//! All problems are collected, not just the first one. Capacity and
//! availability entries for workers outside the roster are not errors;
//! [`unrostered_workers`] lists them so callers can report them.

use std::collections::HashSet;
use std::fmt;

use crate::models::{ScheduleRequest, ShiftCatalog, SLOT_COUNT};

/// Largest accepted need of a single slot.
pub const MAX_NEED: u32 = 10_000;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The roster has no workers.
    EmptyRoster,
    /// Two roster entries share the same ID.
    DuplicateWorker,
    /// A rostered worker has no capacity entry.
    MissingCapacity,
    /// A capacity exceeds the number of catalog slots.
    CapacityOutOfRange,
    /// A catalog slot has no need entry.
    MissingNeed,
    /// A slot's need exceeds [`MAX_NEED`].
    NeedOutOfRange,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a rostering request.
///
/// Checks:
/// 1. The roster is non-empty
/// 2. No duplicate worker IDs
/// 3. Every rostered worker has a capacity in `0..=14`
/// 4. Every catalog slot has a need entry in `0..=MAX_NEED`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_request(request: &ScheduleRequest) -> ValidationResult {
    let mut errors = Vec::new();

    if request.workers.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyRoster,
            "Roster is empty",
        ));
    }

    let mut roster = HashSet::new();
    for w in &request.workers {
        if !roster.insert(w.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateWorker,
                format!("Duplicate worker ID: {w}"),
            ));
        }
    }

    for w in &request.workers {
        match request.capacities.get(w) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingCapacity,
                format!("Worker '{w}' has no capacity"),
            )),
            Some(&cap) if cap as usize > SLOT_COUNT => errors.push(ValidationError::new(
                ValidationErrorKind::CapacityOutOfRange,
                format!("Worker '{w}' capacity {cap} is outside 0..={SLOT_COUNT}"),
            )),
            Some(_) => {}
        }
    }

    for slot in ShiftCatalog::slots() {
        match request.need.get(&slot) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingNeed,
                format!("Slot '{slot}' has no need"),
            )),
            Some(&need) if need > MAX_NEED => errors.push(ValidationError::new(
                ValidationErrorKind::NeedOutOfRange,
                format!("Slot '{slot}' need {need} is outside 0..={MAX_NEED}"),
            )),
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Workers named by capacity or availability entries but absent from the
/// roster, sorted and deduplicated. The model ignores these entries.
pub fn unrostered_workers(request: &ScheduleRequest) -> Vec<&str> {
    let roster: HashSet<&str> = request.workers.iter().map(String::as_str).collect();
    let mut strangers: Vec<&str> = request
        .capacities
        .keys()
        .map(String::as_str)
        .chain(request.availability.workers())
        .filter(|w| !roster.contains(w))
        .collect();
    strangers.sort_unstable();
    strangers.dedup();
    strangers
}
