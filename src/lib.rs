//! Examination timetabling engine.
//!
//! Assigns exam subjects to calendar dates and time slots under hard
//! constraints (no cohort double-booking, per-session seating
//! capacity, holiday and Sunday exclusion, reserved trailing days for
//! cross-branch electives) while keeping the used-day span small.
//! Ingestion (spreadsheet parsing) and rendering (Excel/PDF) are
//! external collaborators consuming the `Timetable` output contract.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `SubjectRecord`, `ExamUnit`,
//!   `DateWindow`, `EngineConfig`, `Timetable`, `Diagnostics`
//! - **`scheduler`**: The passes — unit building, greedy placement,
//!   gap compaction, elective reservation — and `TimetableEngine`
//! - **`validation`**: Read-only post-hoc invariant checks
//!
//! # Guarantees
//!
//! The engine is a single-threaded, deterministic batch computation:
//! identical input always yields identical dates. Only an invalid
//! configuration aborts a run; everything else (window exhaustion,
//! units that never fit, validator findings) is accumulated in
//! `Diagnostics` and returned with the partial schedule.

pub mod models;
pub mod scheduler;
pub mod validation;
