//! Per-user conversation state. Sessions live only for the process lifetime;
//! flows are short enough that losing them on restart is acceptable.

use std::collections::{BTreeSet, HashMap};

/// The multi-step flow a user is currently in. Text input is only meaningful
/// for the flows that carry it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Idle,
    AddingStudents,
    AbsenceSelection,
    AddingGrade,
    AddingMajor,
    AddingTeacher,
    EditingGrade(String),
    EditingMajor(String),
    EditingStudent(String),
    ManagingGrades,
    ManagingMajors,
    ManagingStudents,
}

/// Where the majors-management screens were entered from; decides the Back
/// target without re-deriving it from other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorsOrigin {
    StudentMenu,
    DataMenu,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub flow: Flow,
    pub grade: Option<String>,
    pub major: Option<String>,
    pub page: usize,
    /// Absence multi-select; ordered so one confirmation inserts in a stable
    /// order.
    pub selected: BTreeSet<String>,
    pub majors_origin: Option<MajorsOrigin>,
}

impl Session {
    /// Back to defaults: used on main-menu return, top-level flow switches and
    /// flow completion.
    pub fn reset(&mut self) {
        *self = Session::default();
    }
}

/// Sessions keyed by user id, created lazily. Owned by the engine and passed
/// in, never ambient.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<i64, Session>,
}

impl SessionStore {
    pub fn get_mut(&mut self, user_id: i64) -> &mut Session {
        self.sessions.entry(user_id).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_are_isolated_per_user() {
        let mut store = SessionStore::default();
        store.get_mut(1).grade = Some("10th".to_string());
        store.get_mut(1).selected.insert("A1".to_string());
        assert!(store.get_mut(2).grade.is_none());
        assert!(store.get_mut(2).selected.is_empty());
        assert_eq!(store.get_mut(1).grade.as_deref(), Some("10th"));
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = Session {
            flow: Flow::AbsenceSelection,
            grade: Some("10th".to_string()),
            major: Some("Science".to_string()),
            page: 3,
            ..Session::default()
        };
        session.selected.insert("A1".to_string());
        session.majors_origin = Some(MajorsOrigin::DataMenu);
        session.reset();
        assert_eq!(session.flow, Flow::Idle);
        assert!(session.grade.is_none());
        assert!(session.major.is_none());
        assert_eq!(session.page, 0);
        assert!(session.selected.is_empty());
        assert!(session.majors_origin.is_none());
    }
}
