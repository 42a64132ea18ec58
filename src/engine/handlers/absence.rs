//! Absence marking: multi-select list with idempotent toggles and a single
//! dated confirmation.

use chrono::Utc;

use crate::engine::action::Action;
use crate::engine::handlers::{menus, Ctx};
use crate::engine::paging::{paginate, paginated_rows};
use crate::engine::session::Flow;
use crate::engine::types::{Button, Effect, Keyboard};
use crate::store;

pub fn start_absence_flow(ctx: &mut Ctx) -> anyhow::Result<Vec<Effect>> {
    ctx.session.reset();
    ctx.session.flow = Flow::AbsenceSelection;
    Ok(vec![menus::prompt_grade(
        ctx,
        "Select grade for absence",
        Action::MainMenu,
    )?])
}

pub fn show_absence_list(ctx: &mut Ctx) -> anyhow::Result<Effect> {
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
            Keyboard::back("⬅️ Back", Action::MainMenu),
        ));
    }

    let view = paginate(students.len(), ctx.session.page, ctx.config.page_size);
    ctx.session.page = view.page;

    let items = students[view.start..view.end]
        .iter()
        .map(|s| {
            let mark = if ctx.session.selected.contains(&s.id) {
                "✅"
            } else {
                "⬜️"
            };
            Button::new(
                format!("{mark} {}", s.full_name),
                Action::AbsenceToggle(s.id.clone()),
            )
        })
        .collect();

    let extras = vec![
        Button::new("✅ Confirm Absence", Action::AbsenceConfirm),
        Button::new("⬅️ Back", Action::AbsenceCancel),
    ];
    let keyboard = paginated_rows(items, view, extras, Button::new("⬅️ Back", Action::MainMenu));
    Ok(Effect::screen(
        format!("Mark absences for {grade} - {major}:"),
        keyboard,
    ))
}

/// Flip one student in the selection and re-render the same page.
pub fn toggle_student(ctx: &mut Ctx, student_id: String) -> anyhow::Result<Vec<Effect>> {
    if !ctx.session.selected.remove(&student_id) {
        ctx.session.selected.insert(student_id);
    }
    Ok(vec![show_absence_list(ctx)?])
}

pub fn confirm_absences(ctx: &mut Ctx) -> anyhow::Result<Vec<Effect>> {
    if ctx.session.selected.is_empty() {
        return Ok(vec![Effect::screen(
            "No students selected.",
            Keyboard::back("⬅️ Back", Action::MainMenu),
        )]);
    }

    // One timestamp for the whole confirmation: every insert shares the same
    // calendar date even if the wall clock crosses midnight mid-iteration.
    let now = Utc::now().with_timezone(&ctx.config.timezone);
    let absence_date = now.date_naive();

    let outcome = store::record_absences(
        ctx.conn,
        &ctx.session.selected,
        ctx.user_id,
        absence_date,
        now,
    )?;

    let mut message = format!("Recorded {} absence(s).", outcome.added);
    if outcome.skipped > 0 {
        message.push_str(&format!(
            " Skipped {} duplicate(s) for today.",
            outcome.skipped
        ));
    }

    ctx.session.reset();
    Ok(vec![Effect::message(message), menus::main_menu(ctx)])
}
