use std::fmt;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use wordpeek_core::LookupToken;
use wordpeek_ui::PopupHandle;

use crate::status::ControllerState;

/// Identity of one lookup request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct ActiveRequest {
    pub id: RequestId,
    pub cancel: CancellationToken,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    Settled,
}

impl From<SessionPhase> for ControllerState {
    fn from(phase: SessionPhase) -> Self {
        match phase {
            SessionPhase::Loading => ControllerState::Loading,
            SessionPhase::Settled => ControllerState::Settled,
        }
    }
}

/// The single live popup and its in-flight lookup.
///
/// Dropping a session cancels its request; the popup handle detaches itself.
pub struct PopupSession {
    pub token: LookupToken,
    pub popup: PopupHandle,
    pub request: Option<ActiveRequest>,
    pub phase: SessionPhase,
}

impl PopupSession {
    pub fn pending_request(&self) -> Option<RequestId> {
        self.request.as_ref().map(|r| r.id)
    }

    pub fn cancel_request(&mut self) {
        if let Some(request) = self.request.take() {
            tracing::debug!("Cancelling lookup {} for '{}'", request.id, self.token);
            request.cancel.cancel();
        }
    }
}

impl Drop for PopupSession {
    fn drop(&mut self) {
        self.cancel_request();
    }
}
