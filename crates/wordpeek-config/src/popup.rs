use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_debounce_ms() -> u64 {
    env_or("WORDPEEK_DEBOUNCE_MS", 10)
}

fn default_title() -> String {
    "WordPeek".to_string()
}

fn default_offset() -> f64 {
    15.0
}

fn default_edge_margin() -> f64 {
    20.0
}

fn default_min_edge() -> f64 {
    10.0
}

fn default_width() -> f64 {
    300.0
}

fn default_height() -> f64 {
    180.0
}

fn default_viewport_width() -> f64 {
    1280.0
}

fn default_viewport_height() -> f64 {
    800.0
}

/// Popup layout and timing
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PopupConfig {
    /// Quiet window after a selection before it is processed
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_title")]
    pub title: String,
    /// Distance between the anchor and the popup corner
    #[serde(default = "default_offset")]
    pub offset: f64,
    /// Overflow is checked against the viewport minus this margin
    #[serde(default = "default_edge_margin")]
    pub edge_margin: f64,
    /// Smallest allowed left/top coordinate
    #[serde(default = "default_min_edge")]
    pub min_edge: f64,
    /// Size used while the popup can't be measured yet
    #[serde(default = "default_width")]
    pub default_width: f64,
    #[serde(default = "default_height")]
    pub default_height: f64,
    /// Viewport of the terminal surface
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            title: default_title(),
            offset: default_offset(),
            edge_margin: default_edge_margin(),
            min_edge: default_min_edge(),
            default_width: default_width(),
            default_height: default_height(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}
