//! Exam timetabling domain models.
//!
//! Core data types for representing timetabling inputs and solutions:
//! raw subject records, atomic exam units, the eligible-date window,
//! engine configuration, and the output timetable contract.
//!
//! # Domain Mappings
//!
//! | examplan | Spreadsheet source | Rendered output |
//! |----------|-------------------|-----------------|
//! | SubjectRecord | One normalized row | One timetable cell |
//! | ExamUnit | Common/module/elective group | One date-slot booking |
//! | DateWindow | Exam period minus holidays | Column of dates |
//! | Timetable | n/a | Sheet + diagnostics banner |

mod calendar;
mod config;
mod record;
mod schedule;
mod unit;

pub use calendar::{DateWindow, SlotWindow};
pub use config::{ConfigError, EngineConfig};
pub use record::{BranchSem, SubjectRecord};
pub use schedule::{
    AnnotatedRecord, Assignment, Diagnostics, Timetable, Violation, ViolationType, UNSCHEDULED,
};
pub use unit::{parity_slot, ExamUnit, UnitKind};
