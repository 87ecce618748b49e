use serde::{Deserialize, Serialize};

use crate::env_or;

const DEFAULT_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2";

fn default_base_url() -> String {
    env_or("WORDPEEK_API_BASE", DEFAULT_BASE_URL.to_string())
}

fn default_timeout_seconds() -> u64 {
    env_or("WORDPEEK_TIMEOUT_SECONDS", 30)
}

fn default_language() -> String {
    "en".to_string()
}

/// Remote dictionary lookup settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Base of the lookup endpoint, without the trailing `/entries/...`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout. 0 disables it.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            language: default_language(),
        }
    }
}
