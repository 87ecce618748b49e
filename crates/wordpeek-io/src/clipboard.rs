use std::time::Duration;

use arboard::Clipboard;
use kanal::AsyncSender;
use tokio::time;
use wordpeek_types::{AppEvent, HostEvent, SelectionEvent};

/// Turns every newly copied text into a selection anchored at `anchor`
pub async fn watch_clipboard(
    poll: Duration,
    anchor: (f64, f64),
    event_tx: AsyncSender<AppEvent>,
) -> Result<(), anyhow::Error> {
    let mut clipboard = Clipboard::new()?;
    // whatever was copied before startup is not a selection
    let mut last_text = clipboard.get_text().unwrap_or_default();

    let mut interval = time::interval(poll);

    loop {
        interval.tick().await;
        if let Ok(text) = clipboard.get_text()
            && !text.is_empty()
            && text != last_text
        {
            last_text = text.clone();
            tracing::debug!("Clipboard changed: {} chars", text.len());

            let selection = SelectionEvent::new(text, anchor.0, anchor.1);
            event_tx
                .send(AppEvent::Host(HostEvent::SelectionEnd(selection)))
                .await?;
        }
    }
}
