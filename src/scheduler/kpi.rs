//! Schedule quality metrics.
//!
//! Span and load indicators computed from a finished timetable. The
//! engine minimizes the number of days used; these figures are what a
//! dashboard or report banner shows to judge how tight the result is.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Days used | Distinct assigned dates |
//! | Span | Calendar days first→last assigned date, inclusive |
//! | Units per day | Placed units per assigned date |
//! | Unscheduled | Units that never placed |

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::Timetable;

/// Span and load indicators for a finished timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleStats {
    /// Distinct dates carrying at least one exam.
    pub days_used: usize,
    /// Calendar days between first and last exam, inclusive. Zero for
    /// an empty schedule.
    pub span_days: i64,
    /// Placed units per date, ascending.
    pub units_per_day: BTreeMap<NaiveDate, usize>,
    /// Units with an assignment.
    pub placed_units: usize,
    /// Units that exhausted their sub-window.
    pub unscheduled_units: usize,
}

impl ScheduleStats {
    /// Computes stats from a finished timetable. Read-only.
    pub fn calculate(timetable: &Timetable) -> Self {
        let mut units_per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for assignment in timetable.assignments.values() {
            *units_per_day.entry(assignment.date).or_insert(0) += 1;
        }

        let span_days = match (
            units_per_day.keys().next(),
            units_per_day.keys().next_back(),
        ) {
            (Some(first), Some(last)) => (*last - *first).num_days() + 1,
            _ => 0,
        };

        Self {
            days_used: units_per_day.len(),
            span_days,
            placed_units: timetable.assignments.len(),
            unscheduled_units: timetable.diagnostics.unscheduled_units.len(),
            units_per_day,
        }
    }

    /// Heaviest single day's unit count.
    pub fn peak_day_load(&self) -> usize {
        self.units_per_day.values().copied().max().unwrap_or(0)
    }
}
