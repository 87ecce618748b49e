use std::sync::Arc;

use tokio::sync::watch;

/// Shared on/off flag of the feature.
///
/// Owned by the host (toolbar action, settings); the controller only holds a
/// [`watch::Receiver`] from [`EnabledState::subscribe`] and re-reads it on
/// every change.
#[derive(Clone)]
pub struct EnabledState {
    tx: Arc<watch::Sender<bool>>,
}

impl EnabledState {
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// Notifies subscribers only when the value actually changes
    pub fn set(&self, enabled: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == enabled {
                false
            } else {
                *current = enabled;
                true
            }
        });

        if changed {
            tracing::info!("WordPeek {}", if enabled { "enabled" } else { "disabled" });
        }
    }

    /// Flips the flag and returns the new value
    pub fn toggle(&self) -> bool {
        let next = !self.get();
        self.set(next);
        next
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for EnabledState {
    fn default() -> Self {
        Self::new(true)
    }
}
