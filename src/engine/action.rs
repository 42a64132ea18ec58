//! Button actions, decoded once at the dispatch boundary.
//!
//! The wire form is an opaque token (`"major:edit:Science"`); everything past
//! the boundary works with this enum so dispatch stays an exhaustive match.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Noop,
    MainMenu,
    DataMenu,
    StudentMenu,
    /// Majors management entered from the student menu.
    ManageMajors,
    ManagementMenu,
    AbsenceMenu,
    DataStudents,
    DataStudentsManage,
    DataMajors,
    DataGrades,
    StudentsAdd,
    StudentsView,
    StudentsManage,
    GradeAdd,
    GradeEdit(String),
    GradeDelete(String),
    SelectGrade(String),
    MajorAdd,
    MajorEdit(String),
    MajorDelete(String),
    SelectMajor(String),
    StudentManage(String),
    StudentEdit(String),
    StudentDelete(String),
    Page(usize),
    AbsenceToggle(String),
    AbsenceConfirm,
    AbsenceCancel,
    Export,
    AddTeacher,
}

impl Action {
    /// Decode a wire token. Unknown tokens are the caller's "invalid action".
    pub fn parse(data: &str) -> Option<Action> {
        let exact = match data {
            "noop" => Some(Action::Noop),
            "menu:main" => Some(Action::MainMenu),
            "menu:data" => Some(Action::DataMenu),
            "menu:students" => Some(Action::StudentMenu),
            "menu:majors" => Some(Action::ManageMajors),
            "menu:management" => Some(Action::ManagementMenu),
            "menu:absence" => Some(Action::AbsenceMenu),
            "data:students" => Some(Action::DataStudents),
            "data:students_manage" => Some(Action::DataStudentsManage),
            "data:majors" => Some(Action::DataMajors),
            "data:grades" => Some(Action::DataGrades),
            "students:add" => Some(Action::StudentsAdd),
            "students:view" => Some(Action::StudentsView),
            "students:manage" => Some(Action::StudentsManage),
            "grade:add" => Some(Action::GradeAdd),
            "major:add" => Some(Action::MajorAdd),
            "absence:confirm" => Some(Action::AbsenceConfirm),
            "absence:cancel" => Some(Action::AbsenceCancel),
            "management:export" => Some(Action::Export),
            "management:add_teacher" => Some(Action::AddTeacher),
            _ => None,
        };
        if exact.is_some() {
            return exact;
        }

        if let Some(rest) = data.strip_prefix("grade:edit:") {
            return Some(Action::GradeEdit(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("grade:delete:") {
            return Some(Action::GradeDelete(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("major:edit:") {
            return Some(Action::MajorEdit(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("major:delete:") {
            return Some(Action::MajorDelete(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("major:select:") {
            return Some(Action::SelectMajor(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("student:manage:") {
            return Some(Action::StudentManage(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("student:edit:") {
            return Some(Action::StudentEdit(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("student:delete:") {
            return Some(Action::StudentDelete(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("absence:toggle:") {
            return Some(Action::AbsenceToggle(rest.to_string()));
        }
        if let Some(rest) = data.strip_prefix("page:") {
            return rest.parse::<usize>().ok().map(Action::Page);
        }
        // Bare grade names come last so the fixed grade:* verbs win.
        if let Some(rest) = data.strip_prefix("grade:") {
            if !rest.is_empty() {
                return Some(Action::SelectGrade(rest.to_string()));
            }
        }
        None
    }

    pub fn encode(&self) -> String {
        match self {
            Action::Noop => "noop".to_string(),
            Action::MainMenu => "menu:main".to_string(),
            Action::DataMenu => "menu:data".to_string(),
            Action::StudentMenu => "menu:students".to_string(),
            Action::ManageMajors => "menu:majors".to_string(),
            Action::ManagementMenu => "menu:management".to_string(),
            Action::AbsenceMenu => "menu:absence".to_string(),
            Action::DataStudents => "data:students".to_string(),
            Action::DataStudentsManage => "data:students_manage".to_string(),
            Action::DataMajors => "data:majors".to_string(),
            Action::DataGrades => "data:grades".to_string(),
            Action::StudentsAdd => "students:add".to_string(),
            Action::StudentsView => "students:view".to_string(),
            Action::StudentsManage => "students:manage".to_string(),
            Action::GradeAdd => "grade:add".to_string(),
            Action::GradeEdit(g) => format!("grade:edit:{g}"),
            Action::GradeDelete(g) => format!("grade:delete:{g}"),
            Action::SelectGrade(g) => format!("grade:{g}"),
            Action::MajorAdd => "major:add".to_string(),
            Action::MajorEdit(m) => format!("major:edit:{m}"),
            Action::MajorDelete(m) => format!("major:delete:{m}"),
            Action::SelectMajor(m) => format!("major:select:{m}"),
            Action::StudentManage(id) => format!("student:manage:{id}"),
            Action::StudentEdit(id) => format!("student:edit:{id}"),
            Action::StudentDelete(id) => format!("student:delete:{id}"),
            Action::Page(n) => format!("page:{n}"),
            Action::AbsenceToggle(id) => format!("absence:toggle:{id}"),
            Action::AbsenceConfirm => "absence:confirm".to_string(),
            Action::AbsenceCancel => "absence:cancel".to_string(),
            Action::Export => "management:export".to_string(),
            Action::AddTeacher => "management:add_teacher".to_string(),
        }
    }
}
