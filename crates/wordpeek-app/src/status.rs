use std::fmt;

/// Where the selection controller currently is
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerState {
    /// No popup
    #[default]
    Idle,
    /// Selection seen, waiting for the quiet window to pass
    Debouncing,
    /// Popup visible, lookup in flight
    Loading,
    /// Popup visible with a definition or an error
    Settled,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControllerState::Idle => "idle",
            ControllerState::Debouncing => "debouncing",
            ControllerState::Loading => "loading",
            ControllerState::Settled => "settled",
        };
        f.write_str(name)
    }
}

/// Snapshot published after every transition
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControllerStatus {
    pub state: ControllerState,
    /// Word of the live popup
    pub word: Option<String>,
    pub lookups_started: u64,
}
