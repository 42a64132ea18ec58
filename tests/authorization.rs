mod support;

use support::{
    button, message_text, new_engine, screen_keyboard, screen_text, text, MANAGER, STRANGER,
    TEACHER,
};

const UNAUTHORIZED: &str = "🚫 You are not authorized to use this bot.";

#[test]
fn strangers_are_rejected_without_side_effects() {
    let (mut engine, _dir) = new_engine();

    let effects = button(&mut engine, STRANGER, "menu:main");
    assert_eq!(message_text(&effects), UNAUTHORIZED);
    let effects = button(&mut engine, STRANGER, "grade:add");
    assert_eq!(message_text(&effects), UNAUTHORIZED);
    let effects = text(&mut engine, STRANGER, "12th");
    assert_eq!(message_text(&effects), UNAUTHORIZED);

    let grades: i64 = engine
        .conn()
        .query_row("SELECT COUNT(*) FROM grades", [], |r| r.get(0))
        .expect("count");
    assert_eq!(grades, 2);
}

#[test]
fn teachers_cannot_reach_management_surfaces() {
    let (mut engine, _dir) = new_engine();
    let cases = [
        ("menu:data", "🚫 You are not authorized to access data tools."),
        ("menu:management", "🚫 You are not authorized to access management tools."),
        ("data:grades", "🚫 You are not authorized to manage grades."),
        ("data:students", "🚫 You are not authorized to manage student data."),
        ("data:majors", "🚫 You are not authorized to manage majors."),
        ("students:manage", "🚫 You are not authorized to manage students."),
        ("student:edit:A1", "🚫 You are not authorized to manage students."),
        ("student:delete:A1", "🚫 You are not authorized to manage students."),
        ("major:edit:Science", "🚫 You are not authorized to edit majors."),
        ("management:export", "🚫 You are not authorized to export the database."),
        ("management:add_teacher", "🚫 You are not authorized to manage teachers."),
    ];
    for (token, expected) in cases {
        let effects = button(&mut engine, TEACHER, token);
        assert_eq!(screen_text(&effects), expected, "token {token}");
    }
}

#[test]
fn forbidden_flow_does_not_leave_a_text_handler_armed() {
    let (mut engine, _dir) = new_engine();
    button(&mut engine, TEACHER, "grade:edit:9th");
    // No grade-edit flow was started, so text falls through to the default.
    let effects = text(&mut engine, TEACHER, "9A");
    assert_eq!(message_text(&effects), "Please use the inline menu below.");
    assert!(absenced::store::grade_exists(engine.conn(), "9th").expect("exists"));
}

#[test]
fn main_menu_hides_management_rows_from_teachers() {
    let (mut engine, _dir) = new_engine();

    let effects = button(&mut engine, TEACHER, "menu:main");
    let rows = &screen_keyboard(&effects).rows;
    assert_eq!(rows.len(), 2);

    let effects = button(&mut engine, MANAGER, "menu:main");
    let rows = &screen_keyboard(&effects).rows;
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[2][0].label, "🗂️ Data");
    assert_eq!(rows[3][0].label, "🛠️ Management");
}

#[test]
fn added_teacher_id_gains_access_but_not_management() {
    let (mut engine, _dir) = new_engine();
    let newcomer = 777;

    let effects = button(&mut engine, newcomer, "menu:main");
    assert_eq!(message_text(&effects), UNAUTHORIZED);

    button(&mut engine, MANAGER, "menu:management");
    button(&mut engine, MANAGER, "management:add_teacher");
    let effects = text(&mut engine, MANAGER, "777");
    assert_eq!(message_text(&effects), "Added teacher ID: 777");

    let effects = button(&mut engine, newcomer, "menu:main");
    assert_eq!(screen_text(&effects), "Main Menu:");
    assert_eq!(screen_keyboard(&effects).rows.len(), 2);

    let effects = button(&mut engine, newcomer, "menu:management");
    assert_eq!(
        screen_text(&effects),
        "🚫 You are not authorized to access management tools."
    );
}

#[test]
fn teacher_id_input_is_validated() {
    let (mut engine, _dir) = new_engine();
    button(&mut engine, MANAGER, "management:add_teacher");

    let effects = text(&mut engine, MANAGER, "not-a-number");
    assert_eq!(message_text(&effects), "Please send a numeric Telegram user ID.");

    let effects = text(&mut engine, MANAGER, "-42");
    assert_eq!(message_text(&effects), "Please send a numeric Telegram user ID.");

    // Statically configured ids are reported as already authorized.
    let effects = text(&mut engine, MANAGER, "100");
    assert_eq!(message_text(&effects), "That teacher ID is already authorized.");
}

#[test]
fn re_adding_a_stored_teacher_id_is_reported() {
    let (mut engine, _dir) = new_engine();
    button(&mut engine, MANAGER, "management:add_teacher");
    text(&mut engine, MANAGER, "777");

    button(&mut engine, MANAGER, "management:add_teacher");
    let effects = text(&mut engine, MANAGER, "777");
    assert_eq!(message_text(&effects), "That teacher ID is already authorized.");
}
