//! Major administration and the grade/major selection screens shared by all
//! flows.

use crate::engine::action::Action;
use crate::engine::handlers::{absence, students, Ctx};
use crate::engine::session::{Flow, MajorsOrigin};
use crate::engine::types::{Button, Effect, Keyboard};
use crate::store;
use crate::store::{AddOutcome, DeleteOutcome, RenameOutcome};

/// Back target for the majors-management screens, from the explicit
/// navigation context in the session.
fn origin_back(ctx: &Ctx) -> Action {
    match ctx.session.majors_origin {
        Some(MajorsOrigin::DataMenu) => Action::DataMenu,
        _ => Action::StudentMenu,
    }
}

/// A grade was picked. Management flows branch to their list screens; the
/// default path offers the grade's majors as selectable leaves.
pub fn handle_grade_selection(ctx: &mut Ctx, grade: String) -> anyhow::Result<Vec<Effect>> {
    ctx.session.grade = Some(grade.clone());
    ctx.session.page = 0;

    if ctx.session.flow == Flow::ManagingMajors {
        return Ok(vec![show_major_management(ctx)?]);
    }

    let majors = store::list_majors(ctx.conn, &grade)?;
    if majors.is_empty() {
        let back = if ctx.session.flow == Flow::ManagingStudents {
            Action::DataStudents
        } else {
            Action::MainMenu
        };
        return Ok(vec![Effect::screen(
            "No majors configured for this grade. Use Manage Majors to add them.",
            Keyboard::back("⬅️ Back", back),
        )]);
    }

    let mut rows: Vec<Vec<Button>> = majors
        .into_iter()
        .map(|major| vec![Button::new(major.clone(), Action::SelectMajor(major))])
        .collect();
    rows.push(vec![Button::new("⬅️ Back", Action::MainMenu)]);
    Ok(vec![Effect::screen("Select major:", Keyboard::new(rows))])
}

/// A major was picked; branch on the active flow.
pub fn handle_major_selection(ctx: &mut Ctx, major: String) -> anyhow::Result<Vec<Effect>> {
    ctx.session.major = Some(major);
    ctx.session.page = 0;

    match ctx.session.flow {
        Flow::AddingStudents => Ok(vec![Effect::screen(
            "Send student entries in this format:\n\
             STUDENT_ID,Full Name\n\
             One student per line. Example:\n\
             A1001,Alex Johnson",
            Keyboard::back("⬅️ Cancel", Action::MainMenu),
        )]),
        Flow::AbsenceSelection => Ok(vec![absence::show_absence_list(ctx)?]),
        Flow::ManagingStudents => Ok(vec![students::show_management_list(ctx)?]),
        _ => Ok(vec![students::show_student_list(ctx)?]),
    }
}

/// Majors-management screen. Edit affordances only render for managers;
/// add/delete stay available to any authorized teacher.
pub fn show_major_management(ctx: &Ctx) -> anyhow::Result<Effect> {
    let Some(grade) = ctx.session.grade.clone() else {
        return Ok(Effect::screen(
            "Please select a grade first.",
            Keyboard::default(),
        ));
    };

    let show_edit = ctx.is_management();
    let majors = store::list_majors(ctx.conn, &grade)?;
    let mut rows: Vec<Vec<Button>> = Vec::new();
    for major in majors {
        if show_edit {
            rows.push(vec![
                Button::new(format!("✏️ {major}"), Action::MajorEdit(major.clone())),
                Button::new(format!("🗑️ {major}"), Action::MajorDelete(major)),
            ]);
        } else {
            rows.push(vec![Button::new(
                format!("🗑️ {major}"),
                Action::MajorDelete(major),
            )]);
        }
    }
    rows.push(vec![Button::new("➕ Add Major", Action::MajorAdd)]);
    rows.push(vec![Button::new("⬅️ Back", origin_back(ctx))]);
    Ok(Effect::screen(
        format!("Manage majors for {grade}:"),
        Keyboard::new(rows),
    ))
}

pub fn start_add_major(ctx: &mut Ctx) -> Effect {
    ctx.session.flow = Flow::AddingMajor;
    Effect::screen(
        "Send the new major name.",
        Keyboard::back("⬅️ Cancel", origin_back(ctx)),
    )
}

pub fn start_edit_major(ctx: &mut Ctx, major: String) -> Effect {
    let prompt = format!("Send the new name for major: {major}");
    ctx.session.flow = Flow::EditingMajor(major);
    Effect::screen(prompt, Keyboard::back("⬅️ Cancel", origin_back(ctx)))
}

pub fn handle_major_input(ctx: &mut Ctx, text: &str) -> anyhow::Result<Vec<Effect>> {
    let Some(grade) = ctx.session.grade.clone() else {
        return Ok(vec![Effect::message("Please select a grade first.")]);
    };
    let major = text.trim();
    if major.is_empty() {
        return Ok(vec![Effect::message("Please send a valid major name.")]);
    }
    match store::add_major(ctx.conn, &grade, major)? {
        AddOutcome::AlreadyExists => Ok(vec![Effect::message(
            "That major already exists for this grade.",
        )]),
        AddOutcome::Added => {
            ctx.session.flow = Flow::ManagingMajors;
            Ok(vec![
                Effect::message(format!("Added major: {major}")),
                show_major_management(ctx)?,
            ])
        }
    }
}

pub fn handle_major_edit(ctx: &mut Ctx, old: &str, text: &str) -> anyhow::Result<Vec<Effect>> {
    let Some(grade) = ctx.session.grade.clone() else {
        return Ok(vec![Effect::message("Please select a grade and major first.")]);
    };
    let new = text.trim();
    if new.is_empty() {
        return Ok(vec![Effect::message("Please send a valid major name.")]);
    }
    match store::rename_major(ctx.conn, &grade, old, new)? {
        RenameOutcome::NotFound => Ok(vec![Effect::message("Major not found.")]),
        RenameOutcome::NameTaken => Ok(vec![Effect::message(
            "That major already exists for this grade.",
        )]),
        RenameOutcome::Renamed => {
            ctx.session.flow = Flow::ManagingMajors;
            Ok(vec![
                Effect::message(format!("Updated major to: {new}")),
                show_major_management(ctx)?,
            ])
        }
    }
}

pub fn delete_major(ctx: &Ctx, major: &str) -> anyhow::Result<Vec<Effect>> {
    let Some(grade) = ctx.session.grade.clone() else {
        return Ok(vec![Effect::screen(
            "Please select a grade first.",
            Keyboard::default(),
        )]);
    };
    match store::delete_major(ctx.conn, &grade, major)? {
        DeleteOutcome::NotFound => Ok(vec![Effect::screen("Major not found.", Keyboard::default())]),
        DeleteOutcome::HasDependents => Ok(vec![Effect::screen(
            "Cannot delete a major with students assigned.",
            Keyboard::back("⬅️ Back", origin_back(ctx)),
        )]),
        DeleteOutcome::Deleted => Ok(vec![show_major_management(ctx)?]),
    }
}
