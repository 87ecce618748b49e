use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use wordpeek_dictionary::DefinitionClient;
use wordpeek_types::{AppEvent, HostEvent};
use wordpeek_ui::{PopupView, Surface};

use crate::events::event_loop;
use crate::io::watcher_io;
use crate::selection::SelectionController;
use crate::state::AppState;
use crate::status::ControllerStatus;

/// Centralized channel management
pub struct ChannelSet {
    pub app_events: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub host_events: (AsyncSender<HostEvent>, AsyncReceiver<HostEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_events: kanal::bounded_async(64),
            host_events: kanal::bounded_async(64),
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Sender for injecting events as if they came from the input source
    pub fn app_sender(&self) -> AsyncSender<AppEvent> {
        self.channels.app_events.0.clone()
    }

    pub fn spawn_tasks(
        &self,
        client: Arc<dyn DefinitionClient>,
        surface: Arc<dyn Surface>,
        with_input: bool,
    ) -> (JoinSet<anyhow::Result<()>>, watch::Receiver<ControllerStatus>) {
        let mut tasks = JoinSet::new();

        // Event loop
        tasks.spawn(event_loop(
            self.state.clone(),
            self.channels.app_events.1.clone(),
            self.channels.host_events.0.clone(),
            self.cancel_token.clone(),
        ));

        // Selection controller
        let view = PopupView::new(surface, self.state.config.popup.clone());
        let debounce = Duration::from_millis(self.state.config.popup.debounce_ms);
        let selection =
            SelectionController::new(view, client, self.state.enabled.subscribe(), debounce);
        let status = selection.subscribe();
        tasks.spawn(selection.run(
            self.channels.host_events.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Watcher IO
        if with_input {
            tasks.spawn(watcher_io(
                self.state.clone(),
                self.cancel_token.child_token(),
                self.channels.app_events.0.clone(),
            ));
        }

        (tasks, status)
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    pub async fn cancelled(&self) {
        self.cancel_token.cancelled().await
    }
}
