use std::sync::Arc;
use std::time::Duration;

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;
use wordpeek_config::input::InputSource;
use wordpeek_types::AppEvent;

use crate::state::AppState;

/// Feeds events from the configured input source until cancelled
pub async fn watcher_io(
    state: Arc<AppState>,
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let input = state.config.input.clone();

    match input.source {
        InputSource::Stdin => {
            tracing::info!("Reading commands from stdin");
            tokio::select! {
                result = wordpeek_io::stdin::read_stdin(event_tx) => {
                    if let Err(e) = result {
                        tracing::error!("stdin reader error: {}", e);
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::info!("stdin reader stopping");
                }
            }
        }
        InputSource::Clipboard => {
            tracing::info!("Starting clipboard watcher");
            let poll = Duration::from_millis(input.clipboard_poll_ms);
            let watcher =
                wordpeek_io::clipboard::watch_clipboard(poll, input.clipboard_anchor, event_tx);
            tokio::select! {
                result = watcher => {
                    if let Err(e) = result {
                        tracing::error!("Clipboard watcher error: {}", e);
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::info!("Clipboard watcher stopping");
                }
            }
        }
        InputSource::Websocket => {
            tracing::info!("Starting WebSocket listener on {}", input.ws_url);
            tokio::select! {
                result = wordpeek_io::ws::start_ws_listener(&input.ws_url, event_tx) => {
                    if let Err(e) = result {
                        tracing::error!("WebSocket listener error: {}", e);
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::info!("WebSocket listener stopping");
                }
            }
        }
    }

    Ok(())
}
