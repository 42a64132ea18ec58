mod support;

use absenced::store;
use support::{button, last_screen_text, message_text, new_engine, text, MANAGER};

#[test]
fn rename_grade_cascades_to_majors_and_students() {
    let (mut engine, _dir) = new_engine();
    support::add_students(&mut engine, MANAGER, "9th", "Science", "A1,Jo Smith\nA2,Pat Jones");

    button(&mut engine, MANAGER, "data:grades");
    button(&mut engine, MANAGER, "grade:edit:9th");
    let effects = text(&mut engine, MANAGER, "9A");
    assert_eq!(message_text(&effects), "Updated grade to: 9A");

    let conn = engine.conn();
    assert_eq!(store::list_majors(conn, "9A").expect("majors"), vec!["Science"]);
    assert!(store::list_majors(conn, "9th").expect("majors").is_empty());

    let moved = store::list_students(conn, "9A", "Science").expect("students");
    assert_eq!(moved.len(), 2);
    assert!(store::list_students(conn, "9th", "Science")
        .expect("students")
        .is_empty());
}

#[test]
fn rename_grade_to_existing_name_is_rejected() {
    let (mut engine, _dir) = new_engine();
    button(&mut engine, MANAGER, "data:grades");
    button(&mut engine, MANAGER, "grade:edit:9th");
    let effects = text(&mut engine, MANAGER, "10th");
    assert_eq!(message_text(&effects), "That grade already exists.");
    assert!(store::grade_exists(engine.conn(), "9th").expect("exists"));
}

#[test]
fn rename_missing_grade_reports_not_found() {
    let (mut engine, _dir) = new_engine();
    button(&mut engine, MANAGER, "data:grades");
    button(&mut engine, MANAGER, "grade:edit:9th");
    // The grade disappears between prompt and reply.
    store::delete_major(engine.conn(), "9th", "Science").expect("clear major");
    store::delete_grade(engine.conn(), "9th").expect("clear grade");
    let effects = text(&mut engine, MANAGER, "9A");
    assert_eq!(message_text(&effects), "Grade not found.");
    assert!(!store::grade_exists(engine.conn(), "9A").expect("exists"));
}

#[test]
fn delete_grade_with_dependents_is_refused() {
    let (mut engine, _dir) = new_engine();
    button(&mut engine, MANAGER, "data:grades");
    let effects = button(&mut engine, MANAGER, "grade:delete:9th");
    assert_eq!(
        last_screen_text(&effects),
        "Cannot delete a grade with students or majors assigned."
    );
    assert!(store::grade_exists(engine.conn(), "9th").expect("exists"));
    assert_eq!(
        store::list_majors(engine.conn(), "9th").expect("majors"),
        vec!["Science"]
    );
}

#[test]
fn delete_empty_grade_succeeds() {
    let (mut engine, _dir) = new_engine();
    button(&mut engine, MANAGER, "data:grades");
    button(&mut engine, MANAGER, "grade:add");
    let effects = text(&mut engine, MANAGER, "12th");
    assert_eq!(message_text(&effects), "Added grade: 12th");

    let effects = button(&mut engine, MANAGER, "grade:delete:12th");
    assert_eq!(last_screen_text(&effects), "Manage grades:");
    assert!(!store::grade_exists(engine.conn(), "12th").expect("exists"));
}

#[test]
fn add_duplicate_grade_is_rejected_and_flow_kept_for_retry() {
    let (mut engine, _dir) = new_engine();
    button(&mut engine, MANAGER, "data:grades");
    button(&mut engine, MANAGER, "grade:add");
    let effects = text(&mut engine, MANAGER, "9th");
    assert_eq!(message_text(&effects), "That grade already exists.");

    // Same flow still accepts a corrected name.
    let effects = text(&mut engine, MANAGER, "12th");
    assert_eq!(message_text(&effects), "Added grade: 12th");
}
