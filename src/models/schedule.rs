//! Timetable (solution) model.
//!
//! A timetable is the engine's output contract: one assignment per
//! placed exam unit, the input records annotated with their date and
//! slot, and the diagnostics accumulated across the run. Renderer
//! collaborators consume this; the engine never writes files itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::SubjectRecord;

/// Sentinel date label for units that never found a placement.
pub const UNSCHEDULED: &str = "UNSCHEDULED";

/// A unit's placement: one date and slot shared by all its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Placed unit id.
    pub unit_id: String,
    /// Assigned exam date.
    pub date: NaiveDate,
    /// Assigned slot number.
    pub slot: u8,
    /// Whether the gap optimizer moved this unit to an earlier date.
    pub relocated: bool,
}

impl Assignment {
    /// Creates a fresh (non-relocated) assignment.
    pub fn new(unit_id: impl Into<String>, date: NaiveDate, slot: u8) -> Self {
        Self {
            unit_id: unit_id.into(),
            date,
            slot,
            relocated: false,
        }
    }
}

/// Classification of post-hoc invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Two units occupy the same (date, branch-semester) cell.
    DoubleBooking,
    /// A (date, slot, campus) total exceeds the session ceiling.
    CapacityExceeded,
    /// A unit sits in the wrong sub-window for its kind.
    WindowBreach,
    /// An assignment names a unit the run never built.
    UnknownUnit,
}

/// A validator finding. Collected, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Finding category.
    pub violation_type: ViolationType,
    /// Related unit id.
    pub unit_id: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Creates a double-booking violation.
    pub fn double_booking(unit_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::DoubleBooking,
            unit_id: unit_id.into(),
            message: message.into(),
        }
    }

    /// Creates a capacity violation.
    pub fn capacity_exceeded(unit_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::CapacityExceeded,
            unit_id: unit_id.into(),
            message: message.into(),
        }
    }

    /// Creates a sub-window breach violation.
    pub fn window_breach(unit_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::WindowBreach,
            unit_id: unit_id.into(),
            message: message.into(),
        }
    }

    /// Creates an unknown-unit violation.
    pub fn unknown_unit(unit_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::UnknownUnit,
            unit_id: unit_id.into(),
            message: message.into(),
        }
    }
}

/// Non-fatal conditions accumulated across a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Units that exhausted their sub-window without a placement.
    pub unscheduled_units: Vec<String>,
    /// Post-hoc invariant findings.
    pub violations: Vec<Violation>,
    /// Whether the eligible-date list was too short to reserve
    /// elective dates.
    pub window_exhausted: bool,
}

impl Diagnostics {
    /// Whether the run completed without any findings.
    pub fn is_clean(&self) -> bool {
        self.unscheduled_units.is_empty() && self.violations.is_empty() && !self.window_exhausted
    }
}

/// An input record annotated with its placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    /// The original input row.
    pub record: SubjectRecord,
    /// Assigned date, `None` when the unit never placed.
    pub assigned_date: Option<NaiveDate>,
    /// Assigned slot, `None` when the unit never placed.
    pub assigned_slot: Option<u8>,
}

impl AnnotatedRecord {
    /// Date label for rendering: `%d-%m-%Y` or the `UNSCHEDULED`
    /// sentinel.
    pub fn date_label(&self) -> String {
        match self.assigned_date {
            Some(date) => date.format("%d-%m-%Y").to_string(),
            None => UNSCHEDULED.to_string(),
        }
    }
}

/// A complete engine run result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    /// Placements keyed by unit id (deterministic iteration).
    pub assignments: BTreeMap<String, Assignment>,
    /// Input records annotated with their placement.
    pub records: Vec<AnnotatedRecord>,
    /// Accumulated diagnostics.
    pub diagnostics: Diagnostics,
}

impl Timetable {
    /// Looks up the assignment for a unit.
    pub fn assignment_for(&self, unit_id: &str) -> Option<&Assignment> {
        self.assignments.get(unit_id)
    }

    /// Distinct assigned dates, ascending.
    pub fn dates_used(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.assignments.values().map(|a| a.date).collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Number of placed units.
    pub fn placed_count(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_timetable() -> Timetable {
        let mut t = Timetable::default();
        t.assignments.insert(
            "module:CS301".into(),
            Assignment::new("module:CS301", date(2025, 4, 1), 1),
        );
        t.assignments.insert(
            "module:EC301".into(),
            Assignment::new("module:EC301", date(2025, 4, 3), 2),
        );
        t.assignments.insert(
            "module:ME301".into(),
            Assignment::new("module:ME301", date(2025, 4, 1), 2),
        );
        t
    }

    #[test]
    fn test_dates_used_sorted_deduped() {
        let t = sample_timetable();
        assert_eq!(t.dates_used(), vec![date(2025, 4, 1), date(2025, 4, 3)]);
        assert_eq!(t.placed_count(), 3);
    }

    #[test]
    fn test_assignment_lookup() {
        let t = sample_timetable();
        let a = t.assignment_for("module:CS301").unwrap();
        assert_eq!(a.date, date(2025, 4, 1));
        assert_eq!(a.slot, 1);
        assert!(!a.relocated);
        assert!(t.assignment_for("module:NOPE").is_none());
    }

    #[test]
    fn test_date_label_sentinel() {
        let placed = AnnotatedRecord {
            record: SubjectRecord::new("CSE", 3, "CS301", 100),
            assigned_date: Some(date(2025, 4, 1)),
            assigned_slot: Some(1),
        };
        assert_eq!(placed.date_label(), "01-04-2025");

        let unplaced = AnnotatedRecord {
            record: SubjectRecord::new("CSE", 3, "CS302", 100),
            assigned_date: None,
            assigned_slot: None,
        };
        assert_eq!(unplaced.date_label(), UNSCHEDULED);
    }

    #[test]
    fn test_diagnostics_is_clean() {
        let mut d = Diagnostics::default();
        assert!(d.is_clean());
        d.unscheduled_units.push("module:CS301".into());
        assert!(!d.is_clean());
    }

    #[test]
    fn test_violation_factories() {
        let v = Violation::double_booking("module:CS301", "CSE/S3 booked twice");
        assert_eq!(v.violation_type, ViolationType::DoubleBooking);
        assert_eq!(v.unit_id, "module:CS301");

        let v2 = Violation::capacity_exceeded("module:EC301", "Main over ceiling");
        assert_eq!(v2.violation_type, ViolationType::CapacityExceeded);
    }

    #[test]
    fn test_timetable_serde_round_trip() {
        let t = sample_timetable();
        let json = serde_json::to_string(&t).unwrap();
        let back: Timetable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.placed_count(), 3);
        assert_eq!(back.dates_used(), t.dates_used());
    }
}
