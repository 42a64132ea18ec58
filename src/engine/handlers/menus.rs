//! Static menu screens and the grade prompt that starts most flows.

use crate::engine::action::Action;
use crate::engine::handlers::Ctx;
use crate::engine::types::{Button, Effect, Keyboard};
use crate::store;

pub fn main_menu(ctx: &Ctx) -> Effect {
    let mut rows = vec![
        vec![Button::new("📚 Manage Students", Action::StudentMenu)],
        vec![Button::new("📝 Record Absence", Action::AbsenceMenu)],
    ];
    if ctx.is_management() {
        rows.push(vec![Button::new("🗂️ Data", Action::DataMenu)]);
        rows.push(vec![Button::new("🛠️ Management", Action::ManagementMenu)]);
    }
    Effect::screen("Main Menu:", Keyboard::new(rows))
}

pub fn student_menu() -> Effect {
    Effect::screen(
        "Student Management:",
        Keyboard::new(vec![
            vec![Button::new("➕ Add Students", Action::StudentsAdd)],
            vec![Button::new("📋 View Students", Action::StudentsView)],
            vec![Button::new("🗂️ Manage Majors", Action::ManageMajors)],
            vec![Button::new("⬅️ Back", Action::MainMenu)],
        ]),
    )
}

pub fn data_menu() -> Effect {
    Effect::screen(
        "Data Management:",
        Keyboard::new(vec![
            vec![Button::new("👥 Students", Action::DataStudents)],
            vec![Button::new("🎓 Grades", Action::DataGrades)],
            vec![Button::new("🧭 Majors", Action::DataMajors)],
            vec![Button::new("⬅️ Back", Action::MainMenu)],
        ]),
    )
}

pub fn data_students_menu() -> Effect {
    Effect::screen(
        "Student Data:",
        Keyboard::new(vec![
            vec![Button::new("➕ Add Students", Action::StudentsAdd)],
            vec![Button::new("✏️ Edit/Delete Students", Action::DataStudentsManage)],
            vec![Button::new("⬅️ Back", Action::DataMenu)],
        ]),
    )
}

pub fn management_menu() -> Effect {
    Effect::screen(
        "Management Tools:",
        Keyboard::new(vec![
            vec![Button::new("📤 Export Database", Action::Export)],
            vec![Button::new("➕ Add Teacher ID", Action::AddTeacher)],
            vec![Button::new("⬅️ Back", Action::MainMenu)],
        ]),
    )
}

/// Grade picker screen. Falls back to the configured seed list when the
/// grades table is empty; a fully empty list dead-ends with only Back.
pub fn prompt_grade(ctx: &Ctx, title: &str, back_target: Action) -> anyhow::Result<Effect> {
    let mut grades = store::list_grades(ctx.conn)?;
    if grades.is_empty() {
        grades = ctx.config.grade_names();
    }
    if grades.is_empty() {
        return Ok(Effect::screen(
            "No grades configured yet. Ask a manager to add grades first.",
            Keyboard::back("⬅️ Back", back_target),
        ));
    }
    let mut rows: Vec<Vec<Button>> = grades
        .into_iter()
        .map(|grade| vec![Button::new(grade.clone(), Action::SelectGrade(grade))])
        .collect();
    rows.push(vec![Button::new("⬅️ Back", back_target)]);
    Ok(Effect::screen(title, Keyboard::new(rows)))
}
