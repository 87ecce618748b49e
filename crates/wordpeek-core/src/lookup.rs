use std::fmt;

use crate::error::LookupError;

/// Canonical single word sent to the dictionary, produced by [`crate::normalize`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupToken(String);

impl LookupToken {
    pub(crate) fn new(word: String) -> Self {
        Self(word)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parsed dictionary entry shown by the popup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionEntry {
    pub phonetic: String,
    pub audio_url: Option<String>,
    pub part_of_speech: String,
    pub definition: String,
    pub example: Option<String>,
}

/// Outcome of one lookup attempt
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Success(DefinitionEntry),
    NotFound,
    NetworkError(LookupError),
    /// Superseded or dismissed before completion
    Cancelled,
}

impl LookupResult {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LookupResult::Cancelled)
    }
}
