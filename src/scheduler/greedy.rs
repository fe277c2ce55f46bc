//! Core greedy placement pass.
//!
//! # Algorithm
//!
//! 1. Order units: common units first (they lock one date across many
//!    branches, so they get first pick of early dates), then the rest
//!    largest-first by total student count — the bin-packing heuristic
//!    that keeps late dates from fragmenting.
//! 2. Per unit, walk core dates chronologically; skip dates where any
//!    of the unit's branch-semester keys is already booked.
//! 3. Within a date, take the first slot in the unit's try order whose
//!    capacity ledger still fits the unit's per-campus load.
//! 4. First passing (date, slot) wins: commit grid, ledger, and
//!    assignment, stop searching.
//!
//! A unit that exhausts every core date is recorded as unscheduled and
//! the run continues. The search itself (`attempt_placement`) is pure;
//! only `place_units` commits.
//!
//! # Reference
//! Johnson (1973), "Near-optimal bin packing algorithms" (first-fit
//! decreasing)

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::state::{CapacityLedger, PlacementGrid, SchedulerContext};
use crate::models::{Assignment, ExamUnit, UnitKind};

/// Orders units for the core pass: commons first in input order, then
/// the rest by descending student count, ties by id.
pub fn core_order<'a>(units: impl IntoIterator<Item = &'a ExamUnit>) -> Vec<&'a ExamUnit> {
    let mut ordered: Vec<&ExamUnit> = units.into_iter().collect();
    ordered.sort_by(|a, b| {
        let rank = |u: &ExamUnit| u8::from(u.kind != UnitKind::Common);
        rank(a).cmp(&rank(b)).then_with(|| {
            if a.kind == UnitKind::Common {
                // Stable sort keeps commons in input order
                Ordering::Equal
            } else {
                b.total_students
                    .cmp(&a.total_students)
                    .then_with(|| a.id.cmp(&b.id))
            }
        })
    });
    ordered
}

/// The slots a unit may sit in, in try order: preferred slot first,
/// then the remaining configured slots ascending. Fixed-slot units
/// only ever try their requested slot.
pub fn slot_try_order(unit: &ExamUnit, configured: &[u8]) -> Vec<u8> {
    if unit.fixed_slot {
        return configured
            .iter()
            .copied()
            .filter(|&s| s == unit.preferred_slot)
            .collect();
    }
    let mut order = Vec::with_capacity(configured.len());
    if configured.contains(&unit.preferred_slot) {
        order.push(unit.preferred_slot);
    }
    order.extend(configured.iter().copied().filter(|&s| s != unit.preferred_slot));
    order
}

/// Pure placement search: the first (date, slot) pair where the grid
/// is free for the unit's keys and the ledger fits its load.
///
/// Reads only; committing is the caller's job, so the search is
/// testable without mutating a run.
pub fn attempt_placement(
    unit: &ExamUnit,
    dates: &[NaiveDate],
    grid: &PlacementGrid,
    ledger: &CapacityLedger,
    configured_slots: &[u8],
) -> Option<(NaiveDate, u8)> {
    let slots = slot_try_order(unit, configured_slots);
    for &date in dates {
        if !grid.is_free(date, &unit.keys) {
            continue;
        }
        for &slot in &slots {
            if ledger.fits(date, slot, &unit.campus_load) {
                return Some((date, slot));
            }
        }
    }
    None
}

/// Places the given units in the core window, committing each hit into
/// the context and the assignment map. Misses land in `unscheduled`.
pub fn place_units(
    units: &[&ExamUnit],
    ctx: &mut SchedulerContext,
    assignments: &mut BTreeMap<String, Assignment>,
    unscheduled: &mut Vec<String>,
) {
    let configured = ctx.config.slot_numbers();
    for unit in units {
        match attempt_placement(unit, &ctx.window.core, &ctx.grid, &ctx.ledger, &configured) {
            Some((date, slot)) => {
                ctx.grid.occupy(date, &unit.keys);
                ctx.ledger.commit(date, slot, &unit.campus_load);
                assignments.insert(unit.id.clone(), Assignment::new(&unit.id, date, slot));
                debug!(unit = %unit.id, %date, slot, students = unit.total_students, "placed");
            }
            None => {
                warn!(unit = %unit.id, "no feasible date and slot in core window");
                unscheduled.push(unit.id.clone());
            }
        }
    }
}
