//! Elective placement on the reserved trailing dates.
//!
//! Elective groups draw students from every branch at once, so each
//! one gets a reserved date to itself: group ids in lexicographic
//! order, reserved dates in ascending order, one group per date, all
//! at the configured elective slot. Groups beyond the reserved dates
//! are unscheduled diagnostics.
//!
//! When window exhaustion emptied the reserved sub-window, the engine
//! routes elective units through the core greedy pass instead of here.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::state::SchedulerContext;
use crate::models::{Assignment, ExamUnit, UnitKind};

/// Assigns elective units to the reserved dates.
///
/// Grid and ledger are committed like any other placement so the
/// validator re-derives a consistent final state.
pub fn place_electives(
    units: &[ExamUnit],
    ctx: &mut SchedulerContext,
    assignments: &mut BTreeMap<String, Assignment>,
    unscheduled: &mut Vec<String>,
) {
    let mut electives: Vec<&ExamUnit> = units
        .iter()
        .filter(|u| u.kind == UnitKind::Elective)
        .collect();
    electives.sort_by(|a, b| a.id.cmp(&b.id));

    let slot = ctx.config.elective_slot;
    let reserved = ctx.window.reserved.clone();
    let mut dates = reserved.iter().copied();

    for unit in electives {
        match dates.next() {
            Some(date) => {
                ctx.grid.occupy(date, &unit.keys);
                ctx.ledger.commit(date, slot, &unit.campus_load);
                assignments.insert(unit.id.clone(), Assignment::new(&unit.id, date, slot));
                debug!(unit = %unit.id, %date, slot, "elective placed on reserved date");
            }
            None => {
                warn!(unit = %unit.id, "more elective groups than reserved dates");
                unscheduled.push(unit.id.clone());
            }
        }
    }
}
