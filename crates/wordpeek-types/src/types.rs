use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Events consumed by the app loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum AppEvent {
    /// Input coming from the page/host
    Host(HostEvent),
    /// Flip the enabled flag (toolbar action)
    ToggleEnabled,
    SetEnabled(bool),
    Quit,
}

/// Host input events, each one maps to a controller transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Pointer released after selecting text
    SelectionEnd(SelectionEvent),
    KeyDown {
        key: String,
    },
    PointerDown {
        x: f64,
        y: f64,
    },
    /// Close button of the popup was clicked
    CloseClicked,
    /// Audio button of the popup was clicked
    AudioClicked,
    /// History/navigation change
    Navigation,
    VisibilityChanged {
        hidden: bool,
    },
}

impl HostEvent {
    pub fn is_escape(&self) -> bool {
        matches!(self, HostEvent::KeyDown { key } if key == "Escape")
    }
}

/// Selection observed on the page. An empty `text` is a collapsed selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub text: String,
    pub anchor_x: f64,
    pub anchor_y: f64,
    /// Milliseconds since the unix epoch
    #[serde(default)]
    pub timestamp: u64,
}

impl SelectionEvent {
    pub fn new(text: impl Into<String>, anchor_x: f64, anchor_y: f64) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Self {
            text: text.into(),
            anchor_x,
            anchor_y,
            timestamp,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.text.trim().is_empty()
    }
}
