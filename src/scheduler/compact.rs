//! Gap optimizer: backfills earlier dates after the core pass.
//!
//! Relocates already-placed individual units to the earliest feasible
//! date before their current one, shrinking the schedule span. Common
//! units stay put (moving a date shared by many branches rarely helps
//! and risks cascading conflicts) and elective units live outside the
//! core window entirely.
//!
//! One pass, latest-placed units first so freed days open up for the
//! earlier iterations' leftovers; not iterated to a fixed point.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use tracing::debug;

use super::state::SchedulerContext;
use crate::models::{Assignment, ExamUnit, UnitKind};

/// Moves placed individual units to earlier feasible dates.
///
/// A move keeps the unit's slot; it only happens when the candidate
/// date is free for every branch-semester key and its ledger cell
/// still fits the unit's per-campus load. The old cell is released
/// and debited before the new one is occupied and credited, so a
/// failed check leaves state untouched.
pub fn compact(
    units: &[ExamUnit],
    ctx: &mut SchedulerContext,
    assignments: &mut BTreeMap<String, Assignment>,
) {
    let mut movable: Vec<&ExamUnit> = units
        .iter()
        .filter(|u| u.kind == UnitKind::Individual && assignments.contains_key(&u.id))
        .collect();
    // Latest-placed first; id keeps equal dates deterministic
    movable.sort_by_key(|u| (Reverse(assignments[&u.id].date), u.id.clone()));

    for unit in movable {
        let current = assignments[&unit.id].clone();
        let target = ctx
            .window
            .core
            .iter()
            .copied()
            .take_while(|&d| d < current.date)
            .find(|&d| {
                ctx.grid.is_free(d, &unit.keys)
                    && ctx.ledger.fits(d, current.slot, &unit.campus_load)
            });

        if let Some(new_date) = target {
            ctx.grid.release(current.date, &unit.keys);
            ctx.ledger.debit(current.date, current.slot, &unit.campus_load);
            ctx.grid.occupy(new_date, &unit.keys);
            ctx.ledger.commit(new_date, current.slot, &unit.campus_load);

            if let Some(entry) = assignments.get_mut(&unit.id) {
                entry.date = new_date;
                entry.relocated = true;
            }
            debug!(unit = %unit.id, from = %current.date, to = %new_date, "relocated");
        }
    }
}
