mod support;

use absenced::engine::{Effect, EffectLine, Event, EventKind};
use serde_json::json;
use support::{button, new_engine, MANAGER, TEACHER};

#[test]
fn decodes_inbound_event_lines() {
    let event: Event =
        serde_json::from_str(r#"{"userId":100,"kind":"button","data":"menu:main"}"#)
            .expect("decode button event");
    assert_eq!(event.user_id, 100);
    assert!(matches!(event.kind, EventKind::Button { ref data } if data == "menu:main"));

    let event: Event = serde_json::from_str(r#"{"userId":900,"kind":"text","data":"A1,Jo"}"#)
        .expect("decode text event");
    assert_eq!(event.user_id, 900);
    assert!(matches!(event.kind, EventKind::Text { ref data } if data == "A1,Jo"));
}

#[test]
fn rejects_lines_with_unknown_kind() {
    let result = serde_json::from_str::<Event>(r#"{"userId":1,"kind":"photo","data":"x"}"#);
    assert!(result.is_err());
}

#[test]
fn encodes_screen_effects_with_action_tokens() {
    let (mut engine, _dir) = new_engine();
    let effects = button(&mut engine, TEACHER, "menu:students");
    let line = EffectLine::from_effect(TEACHER, &effects[0]);
    let value = serde_json::to_value(&line).expect("serialize");

    assert_eq!(value["effect"], "screen");
    assert_eq!(value["userId"], TEACHER);
    assert_eq!(value["text"], "Student Management:");
    assert_eq!(value["keyboard"][0][0]["action"], "students:add");
    assert_eq!(value["keyboard"][3][0]["action"], "menu:main");
}

#[test]
fn encodes_message_effects() {
    let effect = Effect::message("Added grade: 12th");
    let line = EffectLine::from_effect(MANAGER, &effect);
    let value = serde_json::to_value(&line).expect("serialize");
    assert_eq!(
        value,
        json!({"effect": "message", "userId": MANAGER, "text": "Added grade: 12th"})
    );
}

#[test]
fn buttons_without_actions_encode_as_noop() {
    let (mut engine, _dir) = new_engine();
    support::add_students(&mut engine, MANAGER, "10th", "Science", "A1,Jo Smith");

    button(&mut engine, TEACHER, "students:view");
    button(&mut engine, TEACHER, "grade:10th");
    let effects = button(&mut engine, TEACHER, "major:select:Science");
    let line = EffectLine::from_effect(TEACHER, &effects[0]);
    let value = serde_json::to_value(&line).expect("serialize");
    assert_eq!(value["keyboard"][0][0]["label"], "Jo Smith");
    assert_eq!(value["keyboard"][0][0]["action"], "noop");
}
