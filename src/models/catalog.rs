//! Shift catalog.
//!
//! The weekly grid of schedulable slots: seven days (Monday first) times
//! two periods. The catalog order is day-major (`Mon-Morning`,
//! `Mon-Evening`, `Tue-Morning`, ...) and every table produced by this
//! crate uses it for its columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of slots in the weekly catalog (7 days × 2 periods).
pub const SLOT_COUNT: usize = Day::ALL.len() * Period::ALL.len();

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    /// All days, Monday first.
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    /// Short label (`"Mon"`, `"Tue"`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }
}

/// Period within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    Morning,
    Evening,
}

impl Period {
    /// All periods in catalog order.
    pub const ALL: [Period; 2] = [Period::Morning, Period::Evening];

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Evening => "Evening",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Day {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseSlotError(s.to_string()))
    }
}

impl FromStr for Period {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ParseSlotError(s.to_string()))
    }
}

/// Error returned when a slot identifier cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid slot identifier '{0}', expected '<Day>-<Period>' such as 'Mon-Morning'")]
pub struct ParseSlotError(pub String);

/// One schedulable (day, period) unit.
///
/// Serialized as its identifier string (`"Mon-Morning"`), so it can key
/// JSON maps directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot {
    pub day: Day,
    pub period: Period,
}

impl Slot {
    /// Creates a slot.
    pub const fn new(day: Day, period: Period) -> Self {
        Self { day, period }
    }

    /// Position of this slot in the catalog (0..14).
    #[inline]
    pub fn index(&self) -> usize {
        self.day as usize * Period::ALL.len() + self.period as usize
    }

    /// Slot identifier, e.g. `"Sat-Evening"`.
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.period)
    }
}

impl FromStr for Slot {
    type Err = ParseSlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, period) = s
            .split_once('-')
            .ok_or_else(|| ParseSlotError(s.to_string()))?;
        let day = day.parse::<Day>().map_err(|_| ParseSlotError(s.to_string()))?;
        let period = period
            .parse::<Period>()
            .map_err(|_| ParseSlotError(s.to_string()))?;
        Ok(Slot::new(day, period))
    }
}

impl TryFrom<String> for Slot {
    type Error = ParseSlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

/// The fixed weekly slot catalog.
///
/// # Example
/// ```
/// use u_shift::models::{ShiftCatalog, SLOT_COUNT};
///
/// let ids = ShiftCatalog::slot_ids();
/// assert_eq!(ids.len(), SLOT_COUNT);
/// assert_eq!(ids[0], "Mon-Morning");
/// assert_eq!(ids[13], "Sun-Evening");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftCatalog;

impl ShiftCatalog {
    /// All slots, day-major.
    pub fn slots() -> Vec<Slot> {
        Day::ALL
            .iter()
            .flat_map(|&day| Period::ALL.iter().map(move |&period| Slot::new(day, period)))
            .collect()
    }

    /// All slot identifiers, day-major.
    pub fn slot_ids() -> Vec<String> {
        Self::slots().iter().map(Slot::id).collect()
    }

    /// Catalog position of a slot.
    #[inline]
    pub fn index_of(slot: Slot) -> usize {
        slot.index()
    }

    /// Slot at a catalog position.
    pub fn slot_at(index: usize) -> Option<Slot> {
        if index >= SLOT_COUNT {
            return None;
        }
        let day = Day::ALL[index / Period::ALL.len()];
        let period = Period::ALL[index % Period::ALL.len()];
        Some(Slot::new(day, period))
    }
}
