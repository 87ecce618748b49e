use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::input::InputConfig;
use self::popup::PopupConfig;

pub mod dictionary;
pub mod input;
pub mod popup;

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dictionary: DictionaryConfig,
    pub popup: PopupConfig,
    pub input: InputConfig,

    /// Initial value of the enabled flag when nothing else sets it
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Config {
    pub fn new() -> Self {
        Config {
            dictionary: DictionaryConfig::default(),
            popup: PopupConfig::default(),
            input: InputConfig::default(),

            enabled: default_enabled(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `name` from the environment and parses it, falling back to `default`
pub(crate) fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
