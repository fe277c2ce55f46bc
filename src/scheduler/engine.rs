//! Pipeline orchestration.
//!
//! `TimetableEngine::run` wires the phases in their fixed order:
//! config validation → date window → unit building → core greedy
//! placement → gap compaction → elective placement → validation →
//! record annotation. Only a `ConfigError` aborts; every other
//! condition lands in the diagnostics and the partial timetable is
//! returned for inspection.
//!
//! The whole run is deterministic: unit, date, and slot orders are
//! all fixed, so identical input always yields identical dates.

use std::collections::BTreeMap;
use tracing::{info, warn};

use super::compact::compact;
use super::elective::place_electives;
use super::greedy::{core_order, place_units};
use super::state::SchedulerContext;
use super::units::{build_units, unit_id_for};
use crate::models::{
    AnnotatedRecord, ConfigError, Diagnostics, EngineConfig, ExamUnit, SubjectRecord, Timetable,
};
use crate::validation::validate_timetable;

/// The examination timetabling engine.
///
/// Stateless; all run state lives in the `SchedulerContext` built per
/// call.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, NaiveTime};
/// use examplan::models::{EngineConfig, SubjectRecord};
/// use examplan::scheduler::TimetableEngine;
///
/// let config = EngineConfig::new(
///     NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
/// )
/// .with_slot(
///     1,
///     NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
///     NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
/// )
/// .with_capacity(1000);
///
/// let records = vec![SubjectRecord::new("CSE", 1, "CS101", 120).with_campus("Main")];
/// let timetable = TimetableEngine::new().run(&records, config).unwrap();
/// assert_eq!(timetable.placed_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableEngine;

impl TimetableEngine {
    /// Creates an engine.
    pub fn new() -> Self {
        Self
    }

    /// Runs the full pipeline over the given records.
    ///
    /// # Errors
    /// `ConfigError` for an invalid configuration or a malformed
    /// elective record; nothing else is fatal.
    pub fn run(
        &self,
        records: &[SubjectRecord],
        config: EngineConfig,
    ) -> Result<Timetable, ConfigError> {
        let mut ctx = SchedulerContext::new(config)?;
        let units = build_units(records)?;
        info!(
            records = records.len(),
            units = units.len(),
            eligible_dates = ctx.window.len(),
            reserved_dates = ctx.window.reserved.len(),
            "starting run"
        );

        let mut diagnostics = Diagnostics::default();
        if ctx.window.exhausted {
            warn!(
                eligible = ctx.window.core.len(),
                "fewer than 3 eligible dates; elective reservation collapsed"
            );
            diagnostics.window_exhausted = true;
        }

        let mut assignments = BTreeMap::new();
        let mut unscheduled = Vec::new();

        // Core pass. With no reserved dates left, electives have
        // nowhere of their own and compete here like individuals.
        let core_units: Vec<&ExamUnit> = units
            .iter()
            .filter(|u| u.is_core() || ctx.window.exhausted)
            .collect();
        let ordered = core_order(core_units);
        place_units(&ordered, &mut ctx, &mut assignments, &mut unscheduled);
        info!(placed = assignments.len(), "core pass complete");

        compact(&units, &mut ctx, &mut assignments);

        if !ctx.window.exhausted {
            place_electives(&units, &mut ctx, &mut assignments, &mut unscheduled);
        }

        diagnostics.unscheduled_units = unscheduled;
        diagnostics.violations = validate_timetable(
            &units,
            &assignments,
            &ctx.window,
            ctx.config.max_students_per_session,
        );
        if !diagnostics.violations.is_empty() {
            warn!(
                violations = diagnostics.violations.len(),
                "validator found invariant violations"
            );
        }

        let annotated = annotate(records, &assignments);
        info!(
            placed = assignments.len(),
            unscheduled = diagnostics.unscheduled_units.len(),
            "run complete"
        );
        Ok(Timetable {
            assignments,
            records: annotated,
            diagnostics,
        })
    }
}

/// Copies each input record with its unit's date and slot.
fn annotate(
    records: &[SubjectRecord],
    assignments: &BTreeMap<String, crate::models::Assignment>,
) -> Vec<AnnotatedRecord> {
    records
        .iter()
        .map(|record| {
            let placed = unit_id_for(record).and_then(|id| assignments.get(&id));
            AnnotatedRecord {
                record: record.clone(),
                assigned_date: placed.map(|a| a.date),
                assigned_slot: placed.map(|a| a.slot),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UnitKind, UNSCHEDULED};
    use chrono::{NaiveDate, NaiveTime};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    /// 1..=10 April 2025: Sunday the 6th drops out, reserved = {9, 10}.
    fn config() -> EngineConfig {
        EngineConfig::new(date(1), date(10))
            .with_slot(1, time(9), time(12))
            .with_slot(2, time(14), time(17))
            .with_capacity(1000)
    }

    #[test]
    fn test_single_common_unit_takes_first_day() {
        // Scenario: a common unit spanning two branches is the only
        // unit; both branches sit it on day 1 in its preferred slot.
        let records = vec![
            SubjectRecord::new("A", 1, "MA101", 100)
                .with_campus("Main")
                .with_common_group("CG1"),
            SubjectRecord::new("B", 1, "MA101", 100)
                .with_campus("Main")
                .with_common_group("CG1"),
        ];
        let timetable = TimetableEngine::new().run(&records, config()).unwrap();

        let a = timetable.assignment_for("common:CG1").unwrap();
        assert_eq!(a.date, date(1));
        assert_eq!(a.slot, 1); // Semester 1 → slot 1
        assert!(timetable.diagnostics.is_clean());
        // Both records annotated with the shared assignment
        for rec in &timetable.records {
            assert_eq!(rec.assigned_date, Some(date(1)));
            assert_eq!(rec.assigned_slot, Some(1));
        }
    }

    #[test]
    fn test_capacity_spills_second_unit_into_slot_two() {
        // Scenario: ceiling 1000; two branch-A units (semesters 1 and
        // 2, both preferring slot 1) load 500 and 600. Largest first:
        // 600 takes day 1 slot 1, 500 cannot join it (1100 > 1000) and
        // lands in day 1 slot 2.
        let records = vec![
            SubjectRecord::new("A", 1, "CS101", 500).with_campus("Main"),
            SubjectRecord::new("A", 2, "CS201", 600).with_campus("Main"),
        ];
        let timetable = TimetableEngine::new().run(&records, config()).unwrap();

        let big = timetable.assignment_for("module:CS201").unwrap();
        let small = timetable.assignment_for("module:CS101").unwrap();
        assert_eq!((big.date, big.slot), (date(1), 1));
        assert_eq!((small.date, small.slot), (date(1), 2));
        assert!(timetable.diagnostics.is_clean());
    }

    #[test]
    fn test_window_exhaustion_degrades_reservation() {
        // Scenario: two eligible dates only. Reservation collapses,
        // the exhaustion diagnostic is set, and electives compete for
        // core dates.
        let records = vec![
            SubjectRecord::new("A", 1, "CS101", 100).with_campus("Main"),
            SubjectRecord::new("B", 5, "OE501", 50)
                .with_campus("Main")
                .as_elective("OE1"),
        ];
        let short = EngineConfig::new(date(1), date(2))
            .with_slot(1, time(9), time(12))
            .with_slot(2, time(14), time(17))
            .with_capacity(1000);
        let timetable = TimetableEngine::new().run(&records, short).unwrap();

        assert!(timetable.diagnostics.window_exhausted);
        let elective = timetable.assignment_for("elective:OE1").unwrap();
        assert!(elective.date == date(1) || elective.date == date(2));
        assert!(timetable.diagnostics.violations.is_empty());
    }

    #[test]
    fn test_electives_fill_reserved_days_exclusively() {
        // Scenario: reserved = {9, 10}; elective groups OE1 → 9,
        // OE2 → 10; no core unit ever lands on a reserved date.
        let mut records = vec![
            SubjectRecord::new("A", 5, "OE501", 40)
                .with_campus("Main")
                .as_elective("OE2"),
            SubjectRecord::new("B", 5, "OE502", 40)
                .with_campus("Main")
                .as_elective("OE1"),
        ];
        for i in 0..6 {
            records.push(SubjectRecord::new("A", 1, format!("CS10{i}"), 100).with_campus("Main"));
        }
        let timetable = TimetableEngine::new().run(&records, config()).unwrap();

        assert_eq!(timetable.assignment_for("elective:OE1").unwrap().date, date(9));
        assert_eq!(timetable.assignment_for("elective:OE2").unwrap().date, date(10));
        for (id, a) in &timetable.assignments {
            if !id.starts_with("elective:") {
                assert!(a.date < date(9), "core unit {id} on reserved date {}", a.date);
            }
        }
        assert!(timetable.diagnostics.violations.is_empty());
    }

    #[test]
    fn test_unplaceable_unit_reported_not_fatal() {
        let records = vec![
            SubjectRecord::new("A", 1, "CS101", 2000).with_campus("Main"), // Over any ceiling
            SubjectRecord::new("B", 1, "EC101", 100).with_campus("Main"),
        ];
        let timetable = TimetableEngine::new().run(&records, config()).unwrap();

        assert_eq!(timetable.diagnostics.unscheduled_units, vec!["module:CS101"]);
        assert!(timetable.assignment_for("module:EC101").is_some());
        // The unplaced record carries the sentinel label
        let unplaced = timetable
            .records
            .iter()
            .find(|r| r.record.module_code == "CS101")
            .unwrap();
        assert_eq!(unplaced.date_label(), UNSCHEDULED);
    }

    #[test]
    fn test_invalid_config_aborts() {
        let records = vec![SubjectRecord::new("A", 1, "CS101", 100)];
        let bad = EngineConfig::new(date(10), date(1))
            .with_slot(1, time(9), time(12))
            .with_capacity(1000);
        assert!(TimetableEngine::new().run(&records, bad).is_err());
    }

    #[test]
    fn test_run_is_deterministic() {
        let mut records = Vec::new();
        for branch in ["CSE", "ECE", "ME", "CE"] {
            for sem in [1u8, 3, 5] {
                for i in 0..3 {
                    records.push(
                        SubjectRecord::new(branch, sem, format!("{branch}{sem}0{i}"), 60 + i * 10)
                            .with_campus(if i == 0 { "City" } else { "Main" }),
                    );
                }
            }
        }
        records.push(
            SubjectRecord::new("CSE", 3, "MA301", 200)
                .with_campus("Main")
                .with_common_group("CG1"),
        );
        records.push(
            SubjectRecord::new("ECE", 3, "MA301", 150)
                .with_campus("Main")
                .with_common_group("CG1"),
        );

        let engine = TimetableEngine::new();
        let first = engine.run(&records, config()).unwrap();
        let second = engine.run(&records, config()).unwrap();
        assert_eq!(first.assignments, second.assignments);
        assert!(first.diagnostics.violations.is_empty());
    }

    #[test]
    fn test_full_run_satisfies_invariants() {
        // A dense mix that forces slot spill and multiple days, then
        // relies on the validator to confirm every invariant.
        let mut records = Vec::new();
        for branch in ["CSE", "ECE", "ME"] {
            for sem in [2u8, 4, 6] {
                for i in 0..4 {
                    records.push(
                        SubjectRecord::new(branch, sem, format!("{branch}{sem}{i}"), 300)
                            .with_campus("Main"),
                    );
                }
            }
        }
        records.push(
            SubjectRecord::new("CSE", 6, "OE601", 120)
                .with_campus("Main")
                .as_elective("OE1"),
        );

        let timetable = TimetableEngine::new().run(&records, config()).unwrap();
        assert!(timetable.diagnostics.violations.is_empty());
        // Elective sits on a reserved date
        let e = timetable.assignment_for("elective:OE1").unwrap();
        assert!(e.date >= date(9));
    }

    #[test]
    fn test_common_units_keep_input_order_priority() {
        let records = vec![
            SubjectRecord::new("A", 1, "PH101", 100)
                .with_campus("Main")
                .with_common_group("CG2"),
            SubjectRecord::new("B", 1, "PH101", 100)
                .with_campus("Main")
                .with_common_group("CG2"),
            SubjectRecord::new("A", 1, "MA101", 500)
                .with_campus("Main")
                .with_common_group("CG1"),
            SubjectRecord::new("B", 1, "MA101", 500)
                .with_campus("Main")
                .with_common_group("CG1"),
        ];
        let timetable = TimetableEngine::new().run(&records, config()).unwrap();

        // CG2 seen first gets day 1 even though CG1 is larger
        assert_eq!(timetable.assignment_for("common:CG2").unwrap().date, date(1));
        assert_eq!(timetable.assignment_for("common:CG1").unwrap().date, date(2));
    }

    #[test]
    fn test_unit_kind_partition() {
        let records = vec![
            SubjectRecord::new("A", 1, "CS101", 100),
            SubjectRecord::new("A", 3, "MA301", 100).with_common_group("CG1"),
            SubjectRecord::new("A", 5, "OE501", 100).as_elective("OE1"),
        ];
        let units = build_units(&records).unwrap();
        let kinds: Vec<UnitKind> = units.iter().map(|u| u.kind).collect();
        assert_eq!(
            kinds,
            vec![UnitKind::Common, UnitKind::Individual, UnitKind::Elective]
        );
    }
}
