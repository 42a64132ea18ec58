//! Grade administration: list with edit/delete affordances, add and rename
//! via text input, guarded delete.

use crate::engine::action::Action;
use crate::engine::handlers::Ctx;
use crate::engine::session::Flow;
use crate::engine::types::{Button, Effect, Keyboard};
use crate::store;
use crate::store::{AddOutcome, DeleteOutcome, RenameOutcome};

pub fn show_grade_management(ctx: &Ctx) -> anyhow::Result<Effect> {
    let grades = store::list_grades(ctx.conn)?;
    let mut rows: Vec<Vec<Button>> = grades
        .into_iter()
        .map(|grade| {
            vec![
                Button::new(format!("✏️ {grade}"), Action::GradeEdit(grade.clone())),
                Button::new(format!("🗑️ {grade}"), Action::GradeDelete(grade)),
            ]
        })
        .collect();
    rows.push(vec![Button::new("➕ Add Grade", Action::GradeAdd)]);
    rows.push(vec![Button::new("⬅️ Back", Action::DataMenu)]);
    Ok(Effect::screen("Manage grades:", Keyboard::new(rows)))
}

pub fn start_add_grade(ctx: &mut Ctx) -> Effect {
    ctx.session.flow = Flow::AddingGrade;
    Effect::screen(
        "Send the new grade name (e.g., 10th).",
        Keyboard::back("⬅️ Cancel", Action::DataMenu),
    )
}

pub fn start_edit_grade(ctx: &mut Ctx, grade: String) -> Effect {
    let prompt = format!("Send the new name for grade: {grade}");
    ctx.session.flow = Flow::EditingGrade(grade);
    Effect::screen(prompt, Keyboard::back("⬅️ Cancel", Action::DataMenu))
}

pub fn handle_grade_input(ctx: &mut Ctx, text: &str) -> anyhow::Result<Vec<Effect>> {
    let grade = text.trim();
    if grade.is_empty() {
        return Ok(vec![Effect::message("Please send a valid grade name.")]);
    }
    match store::add_grade(ctx.conn, grade)? {
        AddOutcome::AlreadyExists => Ok(vec![Effect::message("That grade already exists.")]),
        AddOutcome::Added => {
            ctx.session.flow = Flow::ManagingGrades;
            Ok(vec![
                Effect::message(format!("Added grade: {grade}")),
                show_grade_management(ctx)?,
            ])
        }
    }
}

pub fn handle_grade_edit(ctx: &mut Ctx, old: &str, text: &str) -> anyhow::Result<Vec<Effect>> {
    let new = text.trim();
    if new.is_empty() {
        return Ok(vec![Effect::message("Please send a valid grade name.")]);
    }
    match store::rename_grade(ctx.conn, old, new)? {
        RenameOutcome::NotFound => Ok(vec![Effect::message("Grade not found.")]),
        RenameOutcome::NameTaken => Ok(vec![Effect::message("That grade already exists.")]),
        RenameOutcome::Renamed => {
            ctx.session.flow = Flow::ManagingGrades;
            Ok(vec![
                Effect::message(format!("Updated grade to: {new}")),
                show_grade_management(ctx)?,
            ])
        }
    }
}

pub fn delete_grade(ctx: &Ctx, grade: &str) -> anyhow::Result<Vec<Effect>> {
    match store::delete_grade(ctx.conn, grade)? {
        DeleteOutcome::NotFound => Ok(vec![Effect::screen("Grade not found.", Keyboard::default())]),
        DeleteOutcome::HasDependents => Ok(vec![Effect::screen(
            "Cannot delete a grade with students or majors assigned.",
            Keyboard::back("⬅️ Back", Action::DataMenu),
        )]),
        DeleteOutcome::Deleted => Ok(vec![show_grade_management(ctx)?]),
    }
}

/// Entry from the data menu: reset to a fresh grade-management session.
pub fn enter_grade_management(ctx: &mut Ctx) -> anyhow::Result<Vec<Effect>> {
    ctx.session.reset();
    ctx.session.flow = Flow::ManagingGrades;
    Ok(vec![show_grade_management(ctx)?])
}
