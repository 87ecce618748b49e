use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncReceiver;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use wordpeek_core::{FailureKind, LookupError, LookupResult, LookupToken, normalize};
use wordpeek_dictionary::DefinitionClient;
use wordpeek_types::{HostEvent, Point, SelectionEvent};
use wordpeek_ui::PopupView;

use crate::status::{ControllerState, ControllerStatus};

pub mod session;

use session::{ActiveRequest, PopupSession, RequestId, SessionPhase};

/// Messages sent back to the controller by its own timers and lookups
enum Loopback {
    DebounceElapsed(u64),
    LookupFinished {
        request: RequestId,
        result: LookupResult,
    },
}

/// Selection waiting for the debounce window to pass
struct PendingSelection {
    id: u64,
    selection: SelectionEvent,
    timer: JoinHandle<()>,
}

/// Owns the popup session and drives it from host events.
///
/// Runs as one task; every mutation goes through the transition methods
/// below, so at most one popup and one lookup are live at any time. Results
/// of spawned lookups come back through the loopback channel and are applied
/// only if their request id is still the session's pending one.
pub struct SelectionController {
    view: PopupView,
    client: Arc<dyn DefinitionClient>,
    enabled: watch::Receiver<bool>,
    debounce: Duration,

    session: Option<PopupSession>,
    pending: Option<PendingSelection>,
    next_debounce_id: u64,
    lookups_started: u64,

    loopback_tx: mpsc::UnboundedSender<Loopback>,
    loopback_rx: mpsc::UnboundedReceiver<Loopback>,
    status_tx: watch::Sender<ControllerStatus>,
}

impl SelectionController {
    pub fn new(
        view: PopupView,
        client: Arc<dyn DefinitionClient>,
        enabled: watch::Receiver<bool>,
        debounce: Duration,
    ) -> Self {
        let (loopback_tx, loopback_rx) = mpsc::unbounded_channel();
        let (status_tx, _) = watch::channel(ControllerStatus::default());

        Self {
            view,
            client,
            enabled,
            debounce,
            session: None,
            pending: None,
            next_debounce_id: 0,
            lookups_started: 0,
            loopback_tx,
            loopback_rx,
            status_tx,
        }
    }

    /// Status updates, one per handled event
    pub fn subscribe(&self) -> watch::Receiver<ControllerStatus> {
        self.status_tx.subscribe()
    }

    pub fn state(&self) -> ControllerState {
        if self.pending.is_some() {
            return ControllerState::Debouncing;
        }
        match &self.session {
            Some(session) => session.phase.into(),
            None => ControllerState::Idle,
        }
    }

    /// Process host events until `shutdown` fires or the input channel closes
    pub async fn run(
        mut self,
        host_rx: AsyncReceiver<HostEvent>,
        shutdown: CancellationToken,
    ) -> anyhow::Result<()> {
        tracing::info!("Selection controller started");
        let mut watching_flag = true;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    self.dismiss("shutdown");
                    break;
                }
                event = host_rx.recv() => match event {
                    Ok(event) => self.handle_host_event(event),
                    Err(_) => {
                        self.dismiss("input closed");
                        break;
                    }
                },
                Some(msg) = self.loopback_rx.recv() => self.handle_loopback(msg),
                changed = self.enabled.changed(), if watching_flag => match changed {
                    Ok(()) => {
                        let enabled = *self.enabled.borrow_and_update();
                        self.on_enabled_changed(enabled);
                    }
                    Err(_) => {
                        tracing::warn!("Enabled flag owner went away, keeping last value");
                        watching_flag = false;
                    }
                },
            }

            self.publish();
        }

        self.publish();
        tracing::info!("Selection controller stopped");
        Ok(())
    }

    fn handle_loopback(&mut self, msg: Loopback) {
        match msg {
            Loopback::DebounceElapsed(id) => self.on_debounce_elapsed(id),
            Loopback::LookupFinished { request, result } => {
                self.on_lookup_finished(request, result)
            }
        }
    }

    pub fn handle_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::SelectionEnd(selection) => self.on_selection_end(selection),
            HostEvent::KeyDown { .. } if event.is_escape() => self.dismiss("escape"),
            HostEvent::KeyDown { .. } => {}
            HostEvent::PointerDown { x, y } => {
                if let Some(session) = &self.session
                    && !self.view.contains(&session.popup, Point::new(x, y))
                {
                    self.dismiss("pointer down outside popup");
                }
            }
            HostEvent::CloseClicked => self.dismiss("close button"),
            HostEvent::AudioClicked => {
                if let Some(session) = &self.session {
                    self.view.play_audio(&session.popup);
                }
            }
            HostEvent::Navigation => self.dismiss("navigation"),
            HostEvent::VisibilityChanged { hidden: true } => self.dismiss("page hidden"),
            HostEvent::VisibilityChanged { hidden: false } => {}
        }
    }

    fn on_selection_end(&mut self, selection: SelectionEvent) {
        let anchor = Point::new(selection.anchor_x, selection.anchor_y);
        if let Some(session) = &self.session
            && self.view.contains(&session.popup, anchor)
        {
            tracing::trace!("Selection inside popup ignored");
            return;
        }

        if !*self.enabled.borrow() {
            self.dismiss("disabled");
            return;
        }

        self.cancel_debounce();

        self.next_debounce_id += 1;
        let id = self.next_debounce_id;
        let tx = self.loopback_tx.clone();
        let delay = self.debounce;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Loopback::DebounceElapsed(id));
        });

        self.pending = Some(PendingSelection {
            id,
            selection,
            timer,
        });
    }

    fn on_debounce_elapsed(&mut self, id: u64) {
        let Some(pending) = self.pending.take_if(|p| p.id == id) else {
            tracing::trace!("Stale debounce {} ignored", id);
            return;
        };
        let selection = pending.selection;

        if !self.view.is_available() {
            tracing::debug!("Host context gone, dropping selection");
            self.teardown();
            return;
        }

        if !*self.enabled.borrow() {
            self.teardown();
            return;
        }

        if selection.is_collapsed() {
            self.teardown();
            return;
        }

        let Some(token) = normalize(&selection.text) else {
            tracing::debug!("No lookup token in {:?}", selection.text);
            self.teardown();
            return;
        };

        if let Some(session) = &self.session
            && session.token == token
        {
            tracing::debug!("'{}' already shown", token);
            return;
        }

        // the old session must be gone before the new one issues anything
        self.teardown();
        self.start_session(token, Point::new(selection.anchor_x, selection.anchor_y));
    }

    fn start_session(&mut self, token: LookupToken, anchor: Point) {
        let mut popup = self.view.create(&token);
        self.view.position(&mut popup, anchor);

        let request = RequestId::new();
        let cancel = CancellationToken::new();
        self.lookups_started += 1;
        tracing::debug!("Looking up '{}' ({})", token, request);

        let client = self.client.clone();
        let lookup_token = token.clone();
        let lookup_cancel = cancel.clone();
        let tx = self.loopback_tx.clone();
        tokio::spawn(async move {
            let lookup =
                tokio::spawn(async move { client.lookup(&lookup_token, lookup_cancel).await });

            let result = match lookup.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => LookupResult::Cancelled,
                Err(e) => LookupResult::NetworkError(LookupError::Internal(e.to_string())),
            };
            let _ = tx.send(Loopback::LookupFinished { request, result });
        });

        self.session = Some(PopupSession {
            token,
            popup,
            request: Some(ActiveRequest {
                id: request,
                cancel,
            }),
            phase: SessionPhase::Loading,
        });
    }

    fn on_lookup_finished(&mut self, request: RequestId, result: LookupResult) {
        let Some(session) = self.session.as_mut() else {
            tracing::trace!("Lookup {} finished after teardown", request);
            return;
        };
        if session.pending_request() != Some(request) {
            tracing::trace!("Lookup {} was superseded", request);
            return;
        }
        session.request = None;

        if result.is_cancelled() {
            return;
        }

        if !self.view.is_available() {
            tracing::debug!("Host context gone, discarding result for '{}'", session.token);
            self.teardown();
            return;
        }

        match &result {
            LookupResult::Success(entry) => {
                tracing::debug!("'{}': {}", session.token, entry.part_of_speech);
                self.view.show_success(&mut session.popup, entry);
            }
            failure => {
                let Some(kind) = FailureKind::classify(failure) else {
                    return;
                };
                match (kind, failure) {
                    (FailureKind::NotFound, _) => {
                        tracing::debug!("'{}' not in dictionary", session.token)
                    }
                    (FailureKind::Connectivity, LookupResult::NetworkError(e)) => {
                        tracing::warn!("Lookup for '{}' failed: {}", session.token, e)
                    }
                    (_, LookupResult::NetworkError(e)) => {
                        tracing::error!("Lookup for '{}' failed: {}", session.token, e)
                    }
                    _ => {}
                }
                self.view.show_error(&mut session.popup, kind.message());
            }
        }

        session.phase = SessionPhase::Settled;
    }

    fn on_enabled_changed(&mut self, enabled: bool) {
        if !enabled {
            self.dismiss("disabled");
        }
    }

    fn dismiss(&mut self, reason: &str) {
        if self.state() != ControllerState::Idle {
            tracing::debug!("Dismissing popup: {}", reason);
        }
        self.teardown();
    }

    fn cancel_debounce(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.timer.abort();
        }
    }

    /// Cancel everything in flight and detach the popup
    fn teardown(&mut self) {
        self.cancel_debounce();

        if let Some(mut session) = self.session.take() {
            session.cancel_request();
            self.view.destroy(&mut session.popup);
        }
    }

    fn publish(&self) {
        let status = ControllerStatus {
            state: self.state(),
            word: self.session.as_ref().map(|s| s.token.to_string()),
            lookups_started: self.lookups_started,
        };

        self.status_tx.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            tracing::debug!("Controller {} -> {}", current.state, status.state);
            *current = status;
            true
        });
    }
}
