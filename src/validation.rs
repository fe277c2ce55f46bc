//! Post-hoc invariant validation.
//!
//! Re-derives branch-semester occupancy and per-(date, slot, campus)
//! totals from the final assignment set, independently of the grids
//! the passes maintained, and checks:
//! 1. At most one unit per (date, branch-semester) cell.
//! 2. No (date, slot, campus) total above the session ceiling.
//! 3. Non-electives never on reserved dates; electives never on core
//!    dates (unless reservation collapsed).
//! 4. Every assignment names a known unit.
//!
//! Findings are collected, never thrown: a violation means an
//! algorithm defect or bad input, and the caller decides how to react.
//! Pure over its inputs, so re-running yields identical findings.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{Assignment, BranchSem, DateWindow, ExamUnit, UnitKind, Violation};

/// Checks the final assignment set against the scheduling invariants.
pub fn validate_timetable(
    units: &[ExamUnit],
    assignments: &BTreeMap<String, Assignment>,
    window: &DateWindow,
    max_per_session: u32,
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let by_id: HashMap<&str, &ExamUnit> = units.iter().map(|u| (u.id.as_str(), u)).collect();

    let mut occupancy: HashMap<(NaiveDate, BranchSem), &str> = HashMap::new();
    let mut totals: HashMap<(NaiveDate, u8, &str), u32> = HashMap::new();
    let core: HashSet<NaiveDate> = window.core.iter().copied().collect();
    let reserved: HashSet<NaiveDate> = window.reserved.iter().copied().collect();

    for (unit_id, assignment) in assignments {
        let Some(unit) = by_id.get(unit_id.as_str()) else {
            violations.push(Violation::unknown_unit(
                unit_id.clone(),
                format!("assignment for '{unit_id}' has no matching unit"),
            ));
            continue;
        };

        // Invariant 1: one exam per cohort per date
        for key in &unit.keys {
            match occupancy.get(&(assignment.date, key.clone())) {
                Some(other) => violations.push(Violation::double_booking(
                    unit_id.clone(),
                    format!("{key} already examined on {} by '{other}'", assignment.date),
                )),
                None => {
                    occupancy.insert((assignment.date, key.clone()), unit_id.as_str());
                }
            }
        }

        // Invariant 2: cumulative session load within the ceiling
        for (campus, load) in &unit.campus_load {
            let cell = totals
                .entry((assignment.date, assignment.slot, campus.as_str()))
                .or_insert(0);
            *cell += load;
            if *cell > max_per_session {
                violations.push(Violation::capacity_exceeded(
                    unit_id.clone(),
                    format!(
                        "{campus} holds {cell} students on {} slot {} (ceiling {max_per_session})",
                        assignment.date, assignment.slot
                    ),
                ));
            }
        }

        // Invariant 3: kind must match the sub-window
        let is_elective = unit.kind == UnitKind::Elective;
        if !is_elective && reserved.contains(&assignment.date) {
            violations.push(Violation::window_breach(
                unit_id.clone(),
                format!("non-elective placed on reserved date {}", assignment.date),
            ));
        }
        if is_elective && !reserved.is_empty() && core.contains(&assignment.date) {
            violations.push(Violation::window_breach(
                unit_id.clone(),
                format!("elective placed on core date {}", assignment.date),
            ));
        }
        if !core.contains(&assignment.date) && !reserved.contains(&assignment.date) {
            violations.push(Violation::window_breach(
                unit_id.clone(),
                format!("date {} is outside the eligible window", assignment.date),
            ));
        }
    }

    violations
}
