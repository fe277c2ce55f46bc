//! Exam calendar models.
//!
//! Defines the slot table (named time windows within a day) and the
//! `DateWindow`: the ordered list of eligible exam dates, split into a
//! core sub-window and a trailing elective-reserved sub-window.
//!
//! # Eligibility
//! A date is eligible iff it falls in the configured range, is not a
//! Sunday, and is not in the holiday set.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named exam session within a day, e.g. a morning sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    /// Session start time.
    pub start: NaiveTime,
    /// Session end time.
    pub end: NaiveTime,
}

impl SlotWindow {
    /// Creates a slot window.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for SlotWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Ordered eligible exam dates, split for core and elective placement.
///
/// `reserved` holds the last `reserved_days` eligible dates and is
/// available only to elective units; `core` holds the rest. When fewer
/// than 3 eligible dates exist, reservation collapses (`reserved` is
/// empty) and `exhausted` is set so the caller can record a diagnostic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DateWindow {
    /// Dates available to common and individual units, ascending.
    pub core: Vec<NaiveDate>,
    /// Trailing dates held back for elective groups, ascending.
    pub reserved: Vec<NaiveDate>,
    /// Whether the eligible list was too short to reserve any dates.
    pub exhausted: bool,
}

impl DateWindow {
    /// Minimum eligible dates before any are held back for electives.
    const MIN_ELIGIBLE: usize = 3;

    /// Enumerates eligible dates in `[start, end]` and splits off the
    /// trailing `reserved_days` for electives.
    ///
    /// Sundays and holidays are skipped. The range is assumed valid
    /// (end after start); `EngineConfig::validate` enforces that
    /// before this runs.
    pub fn build(
        start: NaiveDate,
        end: NaiveDate,
        holidays: &BTreeSet<NaiveDate>,
        reserved_days: usize,
    ) -> Self {
        let mut eligible = Vec::new();
        let mut day = start;
        while day <= end {
            if day.weekday() != Weekday::Sun && !holidays.contains(&day) {
                eligible.push(day);
            }
            match day.checked_add_days(Days::new(1)) {
                Some(next) => day = next,
                None => break,
            }
        }

        if eligible.len() < Self::MIN_ELIGIBLE {
            return Self {
                core: eligible,
                reserved: Vec::new(),
                exhausted: true,
            };
        }

        let split = eligible.len() - reserved_days.min(eligible.len());
        let reserved = eligible.split_off(split);
        Self {
            core: eligible,
            reserved,
            exhausted: false,
        }
    }

    /// Total eligible dates across both sub-windows.
    pub fn len(&self) -> usize {
        self.core.len() + self.reserved.len()
    }

    /// Whether no eligible dates exist at all.
    pub fn is_empty(&self) -> bool {
        self.core.is_empty() && self.reserved.is_empty()
    }

    /// Whether a date sits in the reserved sub-window.
    pub fn is_reserved(&self, date: NaiveDate) -> bool {
        self.reserved.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sundays_excluded() {
        // 2025-04-06 and 2025-04-13 are Sundays
        let window = DateWindow::build(date(2025, 4, 1), date(2025, 4, 14), &BTreeSet::new(), 0);
        assert_eq!(window.len(), 12);
        assert!(!window.core.contains(&date(2025, 4, 6)));
        assert!(!window.core.contains(&date(2025, 4, 13)));
        assert!(!window.exhausted);
    }

    #[test]
    fn test_holidays_excluded() {
        let holidays: BTreeSet<NaiveDate> = [date(2025, 4, 2), date(2025, 4, 3)].into();
        let window = DateWindow::build(date(2025, 4, 1), date(2025, 4, 5), &holidays, 0);
        assert_eq!(
            window.core,
            vec![date(2025, 4, 1), date(2025, 4, 4), date(2025, 4, 5)]
        );
    }

    #[test]
    fn test_reserved_split_is_trailing() {
        let window = DateWindow::build(date(2025, 4, 1), date(2025, 4, 5), &BTreeSet::new(), 2);
        assert_eq!(
            window.core,
            vec![date(2025, 4, 1), date(2025, 4, 2), date(2025, 4, 3)]
        );
        assert_eq!(window.reserved, vec![date(2025, 4, 4), date(2025, 4, 5)]);
        assert!(window.is_reserved(date(2025, 4, 5)));
        assert!(!window.is_reserved(date(2025, 4, 3)));
    }

    #[test]
    fn test_exhaustion_collapses_reservation() {
        // Only two eligible dates → no reservation, exhausted flag set
        let window = DateWindow::build(date(2025, 4, 1), date(2025, 4, 2), &BTreeSet::new(), 2);
        assert_eq!(window.core.len(), 2);
        assert!(window.reserved.is_empty());
        assert!(window.exhausted);
    }

    #[test]
    fn test_reservation_never_empties_core() {
        // 3 eligible dates with 2 reserved still leaves one core date
        let window = DateWindow::build(date(2025, 4, 1), date(2025, 4, 3), &BTreeSet::new(), 2);
        assert_eq!(window.core.len(), 1);
        assert_eq!(window.reserved.len(), 2);
    }

    #[test]
    fn test_slot_window_display() {
        let slot = SlotWindow::new(
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
        );
        assert_eq!(slot.to_string(), "09:30 - 12:30");
    }
}
