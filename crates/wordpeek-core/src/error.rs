use crate::lookup::LookupResult;

pub const NOT_FOUND_MESSAGE: &str = "Word not found in dictionary 😕";
pub const CONNECT_MESSAGE: &str = "Could not connect to dictionary. Check internet.";
pub const FALLBACK_MESSAGE: &str = "No definition found 😕";

/// Why a lookup failed to produce an entry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Connect, timeout or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    Status(u16),

    /// The service answered 2xx with a body we can't use
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The lookup itself blew up (panicked task)
    #[error("internal error: {0}")]
    Internal(String),
}

impl LookupError {
    /// Failures that look like the service could not be reached
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport(_) | LookupError::Status(_))
    }
}

/// User-facing classification of a failed lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Connectivity,
    Other,
}

impl FailureKind {
    /// `None` for results that are not shown as failures (success, cancelled)
    pub fn classify(result: &LookupResult) -> Option<Self> {
        match result {
            LookupResult::NotFound => Some(FailureKind::NotFound),
            LookupResult::NetworkError(e) if e.is_transport() => Some(FailureKind::Connectivity),
            LookupResult::NetworkError(_) => Some(FailureKind::Other),
            LookupResult::Success(_) | LookupResult::Cancelled => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FailureKind::NotFound => NOT_FOUND_MESSAGE,
            FailureKind::Connectivity => CONNECT_MESSAGE,
            FailureKind::Other => FALLBACK_MESSAGE,
        }
    }
}
