//! Rostering domain models.
//!
//! Provides the data types that describe a weekly rostering problem and
//! its solution.
//!
//! # Domain Mappings
//!
//! | u-shift | Retail | Healthcare | Call Center |
//! |---------|--------|------------|-------------|
//! | Worker | Store clerk | Nurse | Agent |
//! | Slot | Opening/closing shift | Day/evening shift | Morning/late queue |
//! | Need | Clerks per shift | Nurses on ward | Agents on queue |
//! | Capacity | Contracted shifts | Max shifts/week | Shift quota |

mod availability;
mod catalog;
mod request;
mod schedule;

pub use availability::AvailabilityMatrix;
pub use catalog::{Day, ParseSlotError, Period, ShiftCatalog, Slot, SLOT_COUNT};
pub use request::ScheduleRequest;
pub use schedule::{ScheduleSolution, ScheduleTable, UnderstaffTable};
