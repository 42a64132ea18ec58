//! Student flows: bulk add via text, read-only and management list screens,
//! edit and delete.

use crate::engine::action::Action;
use crate::engine::handlers::{menus, Ctx};
use crate::engine::paging::{paginate, paginated_rows};
use crate::engine::session::Flow;
use crate::engine::types::{Button, Effect, Keyboard};
use crate::store;
use crate::store::{DeleteOutcome, UpdateStudentOutcome};

/// One submitted line split into id and full name; lines that do not parse
/// are collected as format errors, never fatal to the batch.
fn parse_student_lines(text: &str) -> (Vec<(String, String)>, Vec<String>) {
    let mut parsed = Vec::new();
    let mut errors = Vec::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((id, full_name)) = line.split_once(',') else {
            errors.push(format!("Invalid format: {line}"));
            continue;
        };
        let id = id.trim();
        let full_name = full_name.trim();
        if id.is_empty() || full_name.is_empty() {
            errors.push(format!("Missing data: {line}"));
            continue;
        }
        parsed.push((id.to_string(), full_name.to_string()));
    }
    (parsed, errors)
}

pub fn handle_student_input(ctx: &mut Ctx, text: &str) -> anyhow::Result<Vec<Effect>> {
    let (Some(grade), Some(major)) = (ctx.session.grade.clone(), ctx.session.major.clone())
    else {
        return Ok(vec![Effect::message("Please select a grade and major first.")]);
    };

    let text = text.trim();
    if text.is_empty() {
        return Ok(vec![Effect::message(
            "No data received. Please send student entries.",
        )]);
    }

    let (parsed, errors) = parse_student_lines(text);
    if parsed.is_empty() {
        return Ok(vec![Effect::message(
            "No valid entries found. Use `STUDENT_ID,Full Name`.",
        )]);
    }

    let outcome = store::add_students(ctx.conn, &grade, &major, &parsed)?;

    let mut response = vec![format!("Added {} student(s).", outcome.added)];
    if outcome.skipped > 0 {
        response.push(format!("Skipped {} duplicate(s).", outcome.skipped));
    }
    if !errors.is_empty() {
        response.push(format!("Errors:\n{}", errors.join("\n")));
    }

    ctx.session.reset();
    Ok(vec![
        Effect::message(response.join("\n")),
        menus::main_menu(ctx),
    ])
}

/// Read-only paged list of a class.
pub fn show_student_list(ctx: &mut Ctx) -> anyhow::Result<Effect> {
    let (Some(grade), Some(major)) = (ctx.session.grade.clone(), ctx.session.major.clone())
    else {
        return Ok(Effect::screen(
            "Please select grade and major.",
            Keyboard::default(),
        ));
    };

    let students = store::list_students(ctx.conn, &grade, &major)?;
    if students.is_empty() {
        return Ok(Effect::screen(
            "No students found for this class.",
            Keyboard::back("⬅️ Back", Action::StudentMenu),
        ));
    }

    let view = paginate(students.len(), ctx.session.page, ctx.config.page_size);
    ctx.session.page = view.page;

    let items = students[view.start..view.end]
        .iter()
        .map(|s| Button::noop(s.full_name.clone()))
        .collect();
    let keyboard = paginated_rows(
        items,
        view,
        Vec::new(),
        Button::new("⬅️ Back", Action::StudentMenu),
    );
    Ok(Effect::screen(
        format!("Students in {grade} - {major}:"),
        keyboard,
    ))
}

/// Paged list where each student opens the manage-actions screen.
pub fn show_management_list(ctx: &mut Ctx) -> anyhow::Result<Effect> {
    let (Some(grade), Some(major)) = (ctx.session.grade.clone(), ctx.session.major.clone())
    else {
        return Ok(Effect::screen(
            "Please select grade and major.",
            Keyboard::default(),
        ));
    };

    let students = store::list_students(ctx.conn, &grade, &major)?;
    if students.is_empty() {
        return Ok(Effect::screen(
            "No students found for this class.",
            Keyboard::back("⬅️ Back", Action::DataStudents),
        ));
    }

    let view = paginate(students.len(), ctx.session.page, ctx.config.page_size);
    ctx.session.page = view.page;

    let items = students[view.start..view.end]
        .iter()
        .map(|s| Button::new(s.full_name.clone(), Action::StudentManage(s.id.clone())))
        .collect();
    let keyboard = paginated_rows(
        items,
        view,
        Vec::new(),
        Button::new("⬅️ Back", Action::DataStudents),
    );
    Ok(Effect::screen(
        format!("Manage students in {grade} - {major}:"),
        keyboard,
    ))
}

pub fn show_management_actions(ctx: &Ctx, student_id: &str) -> anyhow::Result<Vec<Effect>> {
    let Some(student) = store::get_student(ctx.conn, student_id)? else {
        return Ok(vec![Effect::screen(
            "Student not found.",
            Keyboard::default(),
        )]);
    };

    let keyboard = Keyboard::new(vec![
        vec![Button::new(
            "✏️ Edit Student",
            Action::StudentEdit(student.id.clone()),
        )],
        vec![Button::new(
            "🗑️ Delete Student",
            Action::StudentDelete(student.id.clone()),
        )],
        vec![Button::new("⬅️ Back", Action::StudentsManage)],
    ]);
    let text = format!(
        "Student: {}\nID: {}\nGrade: {}\nMajor: {}",
        student.full_name, student.id, student.grade, student.major
    );
    Ok(vec![Effect::screen(text, keyboard)])
}

pub fn start_edit_student(ctx: &mut Ctx, student_id: String) -> Effect {
    ctx.session.flow = Flow::EditingStudent(student_id);
    Effect::screen(
        "Send updated student info in this format:\n\
         Full Name, Grade, Major\n\
         Example:\n\
         Alex Johnson, 10th, Science",
        Keyboard::back("⬅️ Cancel", Action::StudentsManage),
    )
}

pub fn handle_student_edit(
    ctx: &mut Ctx,
    student_id: &str,
    text: &str,
) -> anyhow::Result<Vec<Effect>> {
    let text = text.trim();
    let parts: Vec<&str> = text.splitn(3, ',').map(str::trim).collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return Ok(vec![Effect::message(
            "Please use the format: Full Name, Grade, Major.",
        )]);
    }
    let (full_name, grade, major) = (parts[0], parts[1], parts[2]);

    match store::update_student(ctx.conn, student_id, full_name, grade, major)? {
        UpdateStudentOutcome::NotFound => Ok(vec![Effect::message("Student not found.")]),
        UpdateStudentOutcome::GradeMissing => {
            Ok(vec![Effect::message("That grade does not exist.")])
        }
        UpdateStudentOutcome::MajorMissing => Ok(vec![Effect::message(
            "That major does not exist for the grade.",
        )]),
        UpdateStudentOutcome::Duplicate => Ok(vec![Effect::message(
            "Another student already exists with that name, grade, and major.",
        )]),
        UpdateStudentOutcome::Updated => {
            ctx.session.flow = Flow::ManagingStudents;
            Ok(vec![
                Effect::message("Student updated."),
                show_management_list(ctx)?,
            ])
        }
    }
}

pub fn delete_student(ctx: &mut Ctx, student_id: &str) -> anyhow::Result<Vec<Effect>> {
    match store::delete_student(ctx.conn, student_id)? {
        DeleteOutcome::NotFound | DeleteOutcome::HasDependents => Ok(vec![Effect::screen(
            "Student not found.",
            Keyboard::default(),
        )]),
        DeleteOutcome::Deleted => Ok(vec![show_management_list(ctx)?]),
    }
}
