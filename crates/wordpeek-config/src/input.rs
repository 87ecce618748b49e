use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_ws_url() -> String {
    env_or("WORDPEEK_WS_URL", "ws://localhost:8080".to_string())
}

fn default_clipboard_poll_ms() -> u64 {
    500
}

/// Where host events come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSource {
    /// Line commands on stdin
    #[default]
    Stdin,
    /// Every newly copied text is treated as a selection
    Clipboard,
    /// JSON events pushed by a page bridge
    Websocket,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub source: InputSource,
    /// WebSocket URL to connect to
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    #[serde(default = "default_clipboard_poll_ms")]
    pub clipboard_poll_ms: u64,
    /// Where popups for clipboard selections are anchored
    pub clipboard_anchor: (f64, f64),
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            source: InputSource::default(),
            ws_url: default_ws_url(),
            clipboard_poll_ms: default_clipboard_poll_ms(),
            clipboard_anchor: (0.0, 0.0),
        }
    }
}
