use futures_util::StreamExt;
use kanal::AsyncSender;
use tokio_tungstenite::connect_async;
use wordpeek_types::AppEvent;

/// Connects to a page bridge and forwards its JSON events until the stream ends
pub async fn start_ws_listener(
    url: &str,
    event_tx: AsyncSender<AppEvent>,
) -> Result<(), anyhow::Error> {
    let (ws_stream, _) = connect_async(url).await?;
    let (_, mut read) = ws_stream.split();
    tracing::info!("Connected to bridge at {}", url);

    while let Some(msg) = read.next().await {
        let msg = msg?;
        if !msg.is_text() {
            continue;
        }

        let Ok(text) = msg.to_text() else {
            continue;
        };

        match serde_json::from_str::<AppEvent>(text) {
            Ok(event) => event_tx.send(event).await?,
            Err(e) => tracing::warn!("Ignoring bridge message: {}", e),
        }
    }

    tracing::info!("Bridge closed the connection");
    Ok(())
}
