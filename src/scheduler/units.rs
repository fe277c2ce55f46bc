//! Unit builder: groups raw records into atomic exam units.
//!
//! Non-elective records with a common-group id become one `Common`
//! unit per group; the remaining non-elective records become one
//! `Individual` unit per distinct module code (covering all branch
//! instances of that module); elective records become one `Elective`
//! unit per elective-group id. Grouping preserves first-seen input
//! order so unit ids and downstream ordering are reproducible.

use std::collections::HashMap;

use crate::models::{ConfigError, ExamUnit, SubjectRecord, UnitKind};

/// Accumulates records per grouping key in first-seen order.
#[derive(Default)]
struct GroupMap {
    order: Vec<String>,
    members: HashMap<String, Vec<SubjectRecord>>,
}

impl GroupMap {
    fn push(&mut self, key: &str, record: SubjectRecord) {
        if !self.members.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.members.entry(key.to_string()).or_default().push(record);
    }

    fn into_units(mut self, prefix: &str, kind: UnitKind) -> Vec<ExamUnit> {
        self.order
            .drain(..)
            .map(|key| {
                let members = self.members.remove(&key).unwrap_or_default();
                ExamUnit::from_members(format!("{prefix}:{key}"), kind, members)
            })
            .collect()
    }
}

/// Groups records into exam units.
///
/// Returns common units first, then individual units, then elective
/// units, each sub-list in first-seen input order. The scheduler
/// applies its own ordering on top.
///
/// # Errors
/// `ConfigError::MissingElectiveGroup` when an elective record carries
/// no elective-group id; rows like that must never reach placement.
pub fn build_units(records: &[SubjectRecord]) -> Result<Vec<ExamUnit>, ConfigError> {
    let mut commons = GroupMap::default();
    let mut individuals = GroupMap::default();
    let mut electives = GroupMap::default();

    for record in records {
        if record.is_elective {
            let group = record
                .elective_group_id
                .as_deref()
                .filter(|g| !g.is_empty())
                .ok_or_else(|| ConfigError::MissingElectiveGroup(record.module_code.clone()))?;
            electives.push(group, record.clone());
        } else if let Some(group) = record.common_group() {
            commons.push(group, record.clone());
        } else {
            individuals.push(&record.module_code, record.clone());
        }
    }

    let mut units = commons.into_units("common", UnitKind::Common);
    units.extend(individuals.into_units("module", UnitKind::Individual));
    units.extend(electives.into_units("elective", UnitKind::Elective));
    Ok(units)
}

/// The unit id a record groups into, mirroring `build_units`.
///
/// `None` only for a malformed elective row, which `build_units`
/// rejects before annotation ever runs.
pub fn unit_id_for(record: &SubjectRecord) -> Option<String> {
    if record.is_elective {
        record
            .elective_group_id
            .as_deref()
            .filter(|g| !g.is_empty())
            .map(|g| format!("elective:{g}"))
    } else if let Some(group) = record.common_group() {
        Some(format!("common:{group}"))
    } else {
        Some(format!("module:{}", record.module_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_grouping_across_branches() {
        let records = vec![
            SubjectRecord::new("CSE", 3, "MA301", 100).with_common_group("CG1"),
            SubjectRecord::new("ECE", 3, "MA301", 80).with_common_group("CG1"),
            SubjectRecord::new("ME", 3, "MA301", 60).with_common_group("CG1"),
        ];
        let units = build_units(&records).unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].id, "common:CG1");
        assert_eq!(units[0].kind, UnitKind::Common);
        assert_eq!(units[0].total_students, 240);
        assert_eq!(units[0].keys.len(), 3);
    }

    #[test]
    fn test_individual_grouping_by_module_code() {
        // Same module code in two branches → one individual unit
        let records = vec![
            SubjectRecord::new("CSE", 3, "CS301", 100),
            SubjectRecord::new("IT", 3, "CS301", 40),
            SubjectRecord::new("CSE", 3, "CS302", 100),
        ];
        let units = build_units(&records).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].id, "module:CS301");
        assert_eq!(units[0].member_count(), 2);
        assert_eq!(units[1].id, "module:CS302");
    }

    #[test]
    fn test_empty_common_group_falls_back_to_individual() {
        let records = vec![
            SubjectRecord::new("CSE", 3, "CS301", 100).with_common_group(""),
            SubjectRecord::new("CSE", 3, "CS302", 100).with_common_group("0"),
        ];
        let units = build_units(&records).unwrap();
        assert!(units.iter().all(|u| u.kind == UnitKind::Individual));
    }

    #[test]
    fn test_elective_grouping() {
        let records = vec![
            SubjectRecord::new("CSE", 5, "OE501", 30).as_elective("OE1"),
            SubjectRecord::new("ECE", 5, "OE502", 25).as_elective("OE1"),
            SubjectRecord::new("ME", 5, "OE503", 20).as_elective("OE2"),
        ];
        let units = build_units(&records).unwrap();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].id, "elective:OE1");
        assert_eq!(units[0].member_count(), 2);
        assert_eq!(units[1].id, "elective:OE2");
    }

    #[test]
    fn test_elective_without_group_rejected() {
        let mut record = SubjectRecord::new("CSE", 5, "OE501", 30);
        record.is_elective = true;
        let err = build_units(&[record]).unwrap_err();
        assert_eq!(err, ConfigError::MissingElectiveGroup("OE501".into()));
    }

    #[test]
    fn test_kind_ordering_and_first_seen() {
        let records = vec![
            SubjectRecord::new("CSE", 3, "CS302", 100),
            SubjectRecord::new("CSE", 3, "MA301", 100).with_common_group("CG1"),
            SubjectRecord::new("CSE", 3, "CS301", 100),
        ];
        let units = build_units(&records).unwrap();
        let ids: Vec<&str> = units.iter().map(|u| u.id.as_str()).collect();
        // Commons lead, individuals keep first-seen input order
        assert_eq!(ids, vec!["common:CG1", "module:CS302", "module:CS301"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(build_units(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_unit_id_mirrors_grouping() {
        let records = vec![
            SubjectRecord::new("CSE", 3, "CS301", 100),
            SubjectRecord::new("CSE", 3, "MA301", 100).with_common_group("CG1"),
            SubjectRecord::new("CSE", 5, "OE501", 30).as_elective("OE1"),
        ];
        let units = build_units(&records).unwrap();
        for record in &records {
            let id = unit_id_for(record).unwrap();
            assert!(units.iter().any(|u| u.id == id), "missing unit for {id}");
        }
    }
}
