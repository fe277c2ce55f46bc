//! Scheduling passes and the pipeline engine.
//!
//! # Algorithm
//!
//! The engine runs a fixed sequence of passes over one shared
//! `SchedulerContext`:
//!
//! 1. **Unit building**: records group into atomic exam units.
//! 2. **Greedy core placement**: commons first, then largest-first
//!    individuals, each taking the earliest (date, slot) that clears
//!    the placement grid and the capacity ledger.
//! 3. **Gap compaction**: placed individual units backfill earlier
//!    freed dates, shrinking the span.
//! 4. **Elective placement**: one elective group per reserved
//!    trailing date.
//!
//! Greedy plus one compaction pass yields a feasible, compact
//! schedule, not a provably minimal span.

mod compact;
mod elective;
mod engine;
mod greedy;
mod kpi;
mod state;
mod units;

pub use compact::compact;
pub use elective::place_electives;
pub use engine::TimetableEngine;
pub use greedy::{attempt_placement, core_order, place_units, slot_try_order};
pub use kpi::ScheduleStats;
pub use state::{CapacityLedger, PlacementGrid, SchedulerContext};
pub use units::{build_units, unit_id_for};
