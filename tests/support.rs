#![allow(dead_code)]

use std::path::Path;

use absenced::config::{Config, GradeSeed};
use absenced::db;
use absenced::engine::{Effect, Engine, Event, EventKind};

pub const MANAGER: i64 = 900;
pub const TEACHER: i64 = 100;
pub const STRANGER: i64 = 555;

pub fn config_for(db_path: &Path) -> Config {
    Config {
        token: "test-token".to_string(),
        timezone: chrono_tz::UTC,
        authorized_teacher_ids: vec![TEACHER],
        management_user_ids: vec![MANAGER],
        grades: vec![
            GradeSeed {
                name: "9th".to_string(),
                majors: vec!["Science".to_string()],
            },
            GradeSeed {
                name: "10th".to_string(),
                majors: vec!["Science".to_string(), "Arts".to_string()],
            },
        ],
        page_size: 10,
        export_interval_hours: 12,
        sqlite_path: db_path.to_path_buf(),
    }
}

pub fn new_engine() -> (Engine, tempfile::TempDir) {
    new_engine_custom(|_| {})
}

pub fn new_engine_custom(tweak: impl FnOnce(&mut Config)) -> (Engine, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let db_path = dir.path().join("absenced.sqlite3");
    let mut config = config_for(&db_path);
    tweak(&mut config);
    let conn = db::open_db(&db_path).expect("open db");
    db::seed_grades(&conn, &config.grades).expect("seed grades");
    (Engine::new(conn, config), dir)
}

pub fn button(engine: &mut Engine, user_id: i64, data: &str) -> Vec<Effect> {
    engine.handle_event(Event {
        user_id,
        kind: EventKind::Button {
            data: data.to_string(),
        },
    })
}

pub fn text(engine: &mut Engine, user_id: i64, data: &str) -> Vec<Effect> {
    engine.handle_event(Event {
        user_id,
        kind: EventKind::Text {
            data: data.to_string(),
        },
    })
}

/// Text of the first screen effect.
pub fn screen_text(effects: &[Effect]) -> &str {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::Screen { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .expect("expected a screen effect")
}

/// Text of the last screen effect.
pub fn last_screen_text(effects: &[Effect]) -> &str {
    effects
        .iter()
        .rev()
        .find_map(|e| match e {
            Effect::Screen { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .expect("expected a screen effect")
}

/// Text of the first plain-message effect.
pub fn message_text(effects: &[Effect]) -> &str {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::Message(text) => Some(text.as_str()),
            _ => None,
        })
        .expect("expected a message effect")
}

/// Keyboard rows of the first screen effect.
pub fn screen_keyboard(effects: &[Effect]) -> &absenced::engine::types::Keyboard {
    effects
        .iter()
        .find_map(|e| match e {
            Effect::Screen { keyboard, .. } => Some(keyboard),
            _ => None,
        })
        .expect("expected a screen effect")
}

/// Walk a user to the student-entry prompt for grade/major.
pub fn open_add_students(engine: &mut Engine, user_id: i64, grade: &str, major: &str) {
    button(engine, user_id, "students:add");
    button(engine, user_id, &format!("grade:{grade}"));
    button(engine, user_id, &format!("major:select:{major}"));
}

/// Seed students through the normal bulk-add flow.
pub fn add_students(engine: &mut Engine, user_id: i64, grade: &str, major: &str, lines: &str) {
    open_add_students(engine, user_id, grade, major);
    let effects = text(engine, user_id, lines);
    assert!(
        message_text(&effects).starts_with("Added"),
        "student add failed: {:?}",
        effects
    );
}
