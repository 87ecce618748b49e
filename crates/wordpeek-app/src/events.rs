use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use wordpeek_types::{AppEvent, HostEvent};

use crate::state::AppState;

/// App's main loop: routes input events to the selection controller and
/// applies control commands
pub async fn event_loop(
    state: Arc<AppState>,
    app_rx: AsyncReceiver<AppEvent>,
    host_tx: AsyncSender<HostEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("Event loop started");

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = app_rx.recv() => event,
        };

        let event = match event {
            Ok(event) => event,
            Err(e) => {
                tracing::info!("Event channel closed: {}", e);
                cancel.cancel();
                break;
            }
        };

        if !handle_event(&state, &host_tx, &cancel, event).await? {
            break;
        }
    }

    tracing::info!("Event loop stopped");
    Ok(())
}

/// Returns `false` once the app should stop
async fn handle_event(
    state: &AppState,
    host_tx: &AsyncSender<HostEvent>,
    cancel: &CancellationToken,
    event: AppEvent,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::Host(host) => {
            tracing::trace!("Host event: {:?}", host);
            host_tx.send(host).await?;
        }
        AppEvent::ToggleEnabled => {
            state.enabled.toggle();
        }
        AppEvent::SetEnabled(enabled) => state.enabled.set(enabled),
        AppEvent::Quit => {
            tracing::info!("Quit requested");
            cancel.cancel();
            return Ok(false);
        }
    }

    Ok(true)
}
