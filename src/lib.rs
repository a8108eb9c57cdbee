//! Weekly shift rostering for the U-Engine ecosystem.
//!
//! Assigns workers to the 14 slots of a week (7 days × morning/evening)
//! under availability and capacity limits, minimizing understaffing first
//! and the busiest worker's load second.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Slot`, `ShiftCatalog`, `ScheduleRequest`,
//!   `AvailabilityMatrix`, `ScheduleSolution`
//! - **`validation`**: Input integrity checks (empty roster, capacities, needs)
//! - **`cp`**: Model builder and objective on the Pumpkin CP solver,
//!   time-bounded search, result extraction, and the `solve_schedule` pipeline
//! - **`scheduler`**: Roster KPIs
//! - **`config`**: Solver configuration (TOML)
//! - **`demo`**: Seeded demo requests
//!
//! # Example
//!
//! ```
//! use u_shift::{solve_schedule, ScheduleRequest, SolverConfig};
//!
//! let request = ScheduleRequest::roster(2)
//!     .with_default_capacity(1)
//!     .with_uniform_need(1, 1);
//!
//! let solution = solve_schedule(&request, &SolverConfig::default())
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(solution.understaff.total(), 12);
//! assert_eq!(solution.fairness, 1);
//! ```
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Van den Bergh et al. (2013), "Personnel scheduling: A literature review"

pub mod config;
pub mod cp;
pub mod demo;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use config::{ObjectiveMode, SolverConfig};
pub use cp::{solve_schedule, SolveStatus};
pub use error::{Result, ScheduleError};
pub use models::{ScheduleRequest, ScheduleSolution, Slot};
