use serde::{Deserialize, Serialize};

use crate::engine::action::Action;

/// Inbound event from the chat transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EventKind {
    Text { data: String },
    Button { data: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// One labeled keyboard button. `action: None` renders as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Option<Action>,
}

impl Button {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Button {
            label: label.into(),
            action: Some(action),
        }
    }

    pub fn noop(label: impl Into<String>) -> Self {
        Button {
            label: label.into(),
            action: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<Button>>) -> Self {
        Keyboard { rows }
    }

    /// Single Back (or Cancel) row, the most common keyboard.
    pub fn back(label: impl Into<String>, target: Action) -> Self {
        Keyboard {
            rows: vec![vec![Button::new(label, target)]],
        }
    }
}

/// Outbound effect handed to the transport adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Render (or replace) the user's current screen.
    Screen { text: String, keyboard: Keyboard },
    /// Plain message without a keyboard.
    Message(String),
    /// Deliver a file; the adapter removes it after delivery.
    SendFile { path: std::path::PathBuf, caption: String },
}

impl Effect {
    pub fn screen(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Effect::Screen {
            text: text.into(),
            keyboard,
        }
    }

    pub fn message(text: impl Into<String>) -> Self {
        Effect::Message(text.into())
    }
}

/// Wire form of an effect on the stdout line protocol.
#[derive(Debug, Serialize)]
#[serde(tag = "effect", rename_all = "camelCase")]
pub enum EffectLine<'a> {
    #[serde(rename_all = "camelCase")]
    Screen {
        user_id: i64,
        text: &'a str,
        keyboard: Vec<Vec<ButtonLine>>,
    },
    #[serde(rename_all = "camelCase")]
    Message { user_id: i64, text: &'a str },
    #[serde(rename_all = "camelCase")]
    SendFile {
        user_id: i64,
        path: String,
        caption: &'a str,
    },
}

#[derive(Debug, Serialize)]
pub struct ButtonLine {
    pub label: String,
    pub action: String,
}

impl<'a> EffectLine<'a> {
    pub fn from_effect(user_id: i64, effect: &'a Effect) -> Self {
        match effect {
            Effect::Screen { text, keyboard } => EffectLine::Screen {
                user_id,
                text,
                keyboard: keyboard
                    .rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|b| ButtonLine {
                                label: b.label.clone(),
                                action: b
                                    .action
                                    .as_ref()
                                    .map(Action::encode)
                                    .unwrap_or_else(|| "noop".to_string()),
                            })
                            .collect()
                    })
                    .collect(),
            },
            Effect::Message(text) => EffectLine::Message { user_id, text },
            Effect::SendFile { path, caption } => EffectLine::SendFile {
                user_id,
                path: path.to_string_lossy().to_string(),
                caption,
            },
        }
    }
}
