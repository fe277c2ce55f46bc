//! Raw subject record model.
//!
//! A `SubjectRecord` is one validated input row from the ingestion
//! collaborator: one subject offered by one branch in one semester on
//! one campus. Records are immutable once built; the engine annotates
//! copies on output rather than mutating the input.

use serde::{Deserialize, Serialize};

/// Key identifying one examined cohort: a branch in a semester.
///
/// At most one exam may occupy a `(date, BranchSem)` cell. Ordered so
/// key sets iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BranchSem {
    /// Branch (stream) code, e.g. "CSE".
    pub branch: String,
    /// Semester number (1-based).
    pub semester: u8,
}

impl BranchSem {
    /// Creates a new branch-semester key.
    pub fn new(branch: impl Into<String>, semester: u8) -> Self {
        Self {
            branch: branch.into(),
            semester,
        }
    }
}

impl std::fmt::Display for BranchSem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/S{}", self.branch, self.semester)
    }
}

/// One subject offering to be examined.
///
/// Produced by the ingestion boundary after column normalization, so
/// the engine never sees malformed rows. `exam_slot_number == 0` means
/// no explicit slot was requested; `common_group_id` and
/// `elective_group_id` are `None` (or empty) when the row is neither
/// common nor elective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRecord {
    /// Degree program, e.g. "B.Tech".
    pub program: String,
    /// Branch (stream) code.
    pub branch: String,
    /// Semester number (1-based).
    pub semester: u8,
    /// Human-readable subject name.
    pub subject_name: String,
    /// Module (subject) code used for grouping individual units.
    pub module_code: String,
    /// Common-subject group id. `None` or empty = not common.
    pub common_group_id: Option<String>,
    /// Explicit exam slot request. 0 = unset, derive from semester.
    pub exam_slot_number: u8,
    /// Number of students sitting this exam.
    pub student_count: u32,
    /// Campus holding the exam (per-campus seating ceilings apply).
    pub campus: String,
    /// Whether this is an open-elective offering.
    pub is_elective: bool,
    /// Elective group id. Required when `is_elective`.
    pub elective_group_id: Option<String>,
}

impl SubjectRecord {
    /// Creates a record with the fields every row must carry.
    pub fn new(
        branch: impl Into<String>,
        semester: u8,
        module_code: impl Into<String>,
        student_count: u32,
    ) -> Self {
        Self {
            program: String::new(),
            branch: branch.into(),
            semester,
            subject_name: String::new(),
            module_code: module_code.into(),
            common_group_id: None,
            exam_slot_number: 0,
            student_count,
            campus: String::new(),
            is_elective: false,
            elective_group_id: None,
        }
    }

    /// Sets the degree program.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the subject name.
    pub fn with_subject_name(mut self, name: impl Into<String>) -> Self {
        self.subject_name = name.into();
        self
    }

    /// Marks the record as part of a common-subject group.
    pub fn with_common_group(mut self, group_id: impl Into<String>) -> Self {
        self.common_group_id = Some(group_id.into());
        self
    }

    /// Requests an explicit exam slot.
    pub fn with_slot(mut self, slot: u8) -> Self {
        self.exam_slot_number = slot;
        self
    }

    /// Sets the campus.
    pub fn with_campus(mut self, campus: impl Into<String>) -> Self {
        self.campus = campus.into();
        self
    }

    /// Marks the record as an elective in the given elective group.
    pub fn as_elective(mut self, group_id: impl Into<String>) -> Self {
        self.is_elective = true;
        self.elective_group_id = Some(group_id.into());
        self
    }

    /// The branch-semester key this record belongs to.
    pub fn branch_sem(&self) -> BranchSem {
        BranchSem::new(self.branch.clone(), self.semester)
    }

    /// Effective common-group id: `None` for empty or "0" markers,
    /// which ingestion sources use interchangeably with absent.
    pub fn common_group(&self) -> Option<&str> {
        match self.common_group_id.as_deref() {
            Some("") | Some("0") | None => None,
            other => other,
        }
    }
}
