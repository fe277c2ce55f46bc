//! Exam unit model.
//!
//! An `ExamUnit` is the atomic schedulable entity: one or more subject
//! records that must sit on the same date and slot (a common subject
//! across branches, one module across its branch instances, or an
//! elective group). Units are built once from immutable input and
//! never split afterward.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{BranchSem, SubjectRecord};

/// Classification of exam units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    /// Subject shared by several branches, examined simultaneously.
    Common,
    /// One module code across its branch instances.
    Individual,
    /// Open-elective group, placed only on reserved trailing dates.
    Elective,
}

/// An atomic schedulable exam.
///
/// All member records share one assignment. The per-campus student
/// split feeds the capacity ledger; the branch-semester key set feeds
/// the placement grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamUnit {
    /// Deterministic unit identifier, e.g. `module:CS301`.
    pub id: String,
    /// Unit classification.
    pub kind: UnitKind,
    /// Member records (owned; the unit is their sole scheduling home).
    pub members: Vec<SubjectRecord>,
    /// Distinct branch-semester keys across members.
    pub keys: BTreeSet<BranchSem>,
    /// Total student count over all members.
    pub total_students: u32,
    /// Student count split by campus.
    pub campus_load: BTreeMap<String, u32>,
    /// Slot to try first (explicit request or semester-parity default).
    pub preferred_slot: u8,
    /// Whether the preferred slot came from an explicit row request.
    /// Fixed units are never placed in any other slot.
    pub fixed_slot: bool,
}

impl ExamUnit {
    /// Builds a unit from its member records.
    ///
    /// The preferred slot is the first nonzero explicit slot among
    /// members (setting the fixed flag), else the parity default for
    /// the first member's semester.
    pub fn from_members(id: impl Into<String>, kind: UnitKind, members: Vec<SubjectRecord>) -> Self {
        let keys: BTreeSet<BranchSem> = members.iter().map(|r| r.branch_sem()).collect();
        let total_students: u32 = members.iter().map(|r| r.student_count).sum();

        let mut campus_load: BTreeMap<String, u32> = BTreeMap::new();
        for rec in &members {
            *campus_load.entry(rec.campus.clone()).or_insert(0) += rec.student_count;
        }

        let explicit = members
            .iter()
            .map(|r| r.exam_slot_number)
            .find(|&s| s != 0);
        let (preferred_slot, fixed_slot) = match explicit {
            Some(slot) => (slot, true),
            None => {
                let semester = members.first().map(|r| r.semester).unwrap_or(1);
                (parity_slot(semester), false)
            }
        };

        Self {
            id: id.into(),
            kind,
            members,
            keys,
            total_students,
            campus_load,
            preferred_slot,
            fixed_slot,
        }
    }

    /// Number of member records.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Whether the unit may be placed in the core window.
    #[inline]
    pub fn is_core(&self) -> bool {
        self.kind != UnitKind::Elective
    }
}

/// Semester-parity slot default.
///
/// Semesters pair up (1-2, 3-4, ...); odd pairs sit in slot 1, even
/// pairs in slot 2: `indicator = ((semester + 1) / 2) % 2`, indicator
/// 1 → slot 1, else slot 2.
pub fn parity_slot(semester: u8) -> u8 {
    if ((u16::from(semester) + 1) / 2) % 2 == 1 {
        1
    } else {
        2
    }
}
