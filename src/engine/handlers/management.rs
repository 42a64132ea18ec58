//! Management tools: database export and runtime teacher authorization.

use crate::backup;
use crate::engine::action::Action;
use crate::engine::handlers::{menus, Ctx};
use crate::engine::session::Flow;
use crate::engine::types::{Effect, Keyboard};
use crate::store;
use crate::store::AddOutcome;

pub const MANUAL_EXPORT_CAPTION: &str = "📦 Manual database export";
pub const SCHEDULED_EXPORT_CAPTION: &str = "⏰ Automated database export";
const DB_MISSING_MESSAGE: &str = "Database file not found. Please check the sqlite_path setting.";

/// Build the send-file effect for one export, or the missing-database notice.
/// A missing source file is user-visible, never fatal.
fn export_effect(ctx: &Ctx, caption: &str) -> anyhow::Result<Effect> {
    if !ctx.config.sqlite_path.is_file() {
        return Ok(Effect::message(DB_MISSING_MESSAGE));
    }
    let summary = backup::export_bundle(ctx.conn, &ctx.config.sqlite_path)?;
    Ok(Effect::SendFile {
        path: summary.bundle_path,
        caption: caption.to_string(),
    })
}

/// Manual export requested from the management menu.
pub fn export_database(ctx: &Ctx) -> anyhow::Result<Vec<Effect>> {
    let mut effects = vec![Effect::screen(
        "Preparing database export...",
        Keyboard::default(),
    )];
    effects.push(export_effect(ctx, MANUAL_EXPORT_CAPTION)?);
    effects.push(menus::management_menu());
    Ok(effects)
}

/// Scheduled export: one bundle per management recipient, addressed
/// individually because recipients have no current screen context.
pub fn scheduled_export(ctx: &Ctx) -> anyhow::Result<Effect> {
    export_effect(ctx, SCHEDULED_EXPORT_CAPTION)
}

pub fn start_add_teacher(ctx: &mut Ctx) -> Effect {
    ctx.session.reset();
    ctx.session.flow = Flow::AddingTeacher;
    Effect::screen(
        "Send the teacher's Telegram user ID (numbers only).",
        Keyboard::back("⬅️ Cancel", Action::ManagementMenu),
    )
}

pub fn handle_teacher_input(ctx: &mut Ctx, text: &str) -> anyhow::Result<Vec<Effect>> {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Ok(vec![Effect::message("Please send a numeric Telegram user ID.")]);
    }
    let Ok(teacher_id) = text.parse::<i64>() else {
        // Digits but out of i64 range.
        return Ok(vec![Effect::message("Please send a numeric Telegram user ID.")]);
    };

    if ctx.config.authorized_teacher_ids.contains(&teacher_id) {
        ctx.session.flow = Flow::Idle;
        return Ok(vec![
            Effect::message("That teacher ID is already authorized."),
            menus::management_menu(),
        ]);
    }

    match store::add_authorized_teacher(ctx.conn, teacher_id)? {
        AddOutcome::AlreadyExists => {
            ctx.session.flow = Flow::Idle;
            Ok(vec![
                Effect::message("That teacher ID is already authorized."),
                menus::management_menu(),
            ])
        }
        AddOutcome::Added => {
            ctx.session.flow = Flow::Idle;
            Ok(vec![
                Effect::message(format!("Added teacher ID: {teacher_id}")),
                menus::management_menu(),
            ])
        }
    }
}
