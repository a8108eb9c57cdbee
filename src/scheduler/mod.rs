//! Roster evaluation.
//!
//! # KPI
//!
//! `ScheduleKpi` computes staffing metrics for a solved roster: coverage,
//! shortfall, workload balance, and capacity utilization.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

mod kpi;

pub use kpi::ScheduleKpi;
