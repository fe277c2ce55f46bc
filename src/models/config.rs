//! Engine configuration.
//!
//! All scheduling parameters live in one `EngineConfig` value threaded
//! through the pipeline; the engine keeps no ambient state.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use super::SlotWindow;

/// Fatal configuration problems, detected before any unit is built.
///
/// Everything else the engine encounters (window exhaustion, units
/// that never fit, validator findings) is a diagnostic, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The end date is not strictly after the start date.
    #[error("end date {end} is not after start date {start}")]
    InvalidDateRange {
        /// Configured start of the exam period.
        start: NaiveDate,
        /// Configured end of the exam period.
        end: NaiveDate,
    },
    /// The per-session seating ceiling is zero.
    #[error("max students per session must be positive")]
    NonPositiveCapacity,
    /// No exam slots are configured.
    #[error("no exam slots configured")]
    NoSlots,
    /// The elective slot number is not in the slot table.
    #[error("elective slot {0} is not a configured slot")]
    UnknownElectiveSlot(u8),
    /// An elective record arrived without its elective group id.
    #[error("elective record for module '{0}' has no elective group id")]
    MissingElectiveGroup(String),
}

/// Scheduling parameters for one engine run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// First day of the exam period.
    pub start_date: NaiveDate,
    /// Last day of the exam period (must be strictly after the start).
    pub end_date: NaiveDate,
    /// Dates excluded from scheduling in addition to Sundays.
    pub holidays: BTreeSet<NaiveDate>,
    /// Slot table: slot number → session times, ascending by number.
    pub slots: BTreeMap<u8, SlotWindow>,
    /// Seating ceiling per (date, slot, campus).
    pub max_students_per_session: u32,
    /// Trailing eligible dates held back for elective groups.
    pub reserved_elective_days: usize,
    /// Slot elective groups sit in on their reserved dates.
    pub elective_slot: u8,
}

impl EngineConfig {
    /// Default number of trailing dates reserved for electives.
    pub const DEFAULT_RESERVED_DAYS: usize = 2;

    /// Creates a config for the given exam period with defaults:
    /// no holidays, no slots yet, 2 reserved elective days, elective
    /// slot 1.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            holidays: BTreeSet::new(),
            slots: BTreeMap::new(),
            max_students_per_session: 0,
            reserved_elective_days: Self::DEFAULT_RESERVED_DAYS,
            elective_slot: 1,
        }
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Adds an exam slot.
    pub fn with_slot(mut self, number: u8, start: NaiveTime, end: NaiveTime) -> Self {
        self.slots.insert(number, SlotWindow::new(start, end));
        self
    }

    /// Sets the per-session seating ceiling.
    pub fn with_capacity(mut self, max_students: u32) -> Self {
        self.max_students_per_session = max_students;
        self
    }

    /// Sets how many trailing dates are reserved for electives.
    pub fn with_reserved_days(mut self, days: usize) -> Self {
        self.reserved_elective_days = days;
        self
    }

    /// Sets the slot elective groups are placed in.
    pub fn with_elective_slot(mut self, slot: u8) -> Self {
        self.elective_slot = slot;
        self
    }

    /// Slot numbers in ascending order.
    pub fn slot_numbers(&self) -> Vec<u8> {
        self.slots.keys().copied().collect()
    }

    /// Checks the fatal configuration rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.end_date <= self.start_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.max_students_per_session == 0 {
            return Err(ConfigError::NonPositiveCapacity);
        }
        if self.slots.is_empty() {
            return Err(ConfigError::NoSlots);
        }
        if !self.slots.contains_key(&self.elective_slot) {
            return Err(ConfigError::UnknownElectiveSlot(self.elective_slot));
        }
        Ok(())
    }
}
