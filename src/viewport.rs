//! Container measurements fanned out to open canvas sessions.
//!
//! The host measures the canvas container on mount and on every resize and
//! publishes it here. Each open canvas holds a [`ViewportSubscription`];
//! dropping the subscription is how a canvas stops listening.

use canvas::engine::{Action, EngineCore};
use canvas::layout::Container;
use tokio::sync::watch;

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

#[derive(Debug)]
pub struct ViewportFeed {
    tx: watch::Sender<Option<Container>>,
}

impl Default for ViewportFeed {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }
}

impl ViewportFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new measurement. Works with or without listeners.
    pub fn publish(&self, container: Container) {
        tracing::debug!(width = container.width, height = container.height, "viewport measured");
        self.tx.send_replace(Some(container));
    }

    /// The container went away (unmounted or hidden).
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    #[must_use]
    pub fn latest(&self) -> Option<Container> {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> ViewportSubscription {
        ViewportSubscription { rx: self.tx.subscribe() }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn active_listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[derive(Debug)]
pub struct ViewportSubscription {
    rx: watch::Receiver<Option<Container>>,
}

impl ViewportSubscription {
    /// Push the current measurement into the engine regardless of what was seen.
    pub fn apply_current(&mut self, engine: &mut EngineCore) -> Vec<Action> {
        let current = *self.rx.borrow_and_update();
        apply(engine, current)
    }

    /// Push the latest measurement into the engine if it changed since the last sync.
    pub fn sync(&mut self, engine: &mut EngineCore) -> Vec<Action> {
        match self.rx.has_changed() {
            Ok(true) => self.apply_current(engine),
            Ok(false) => Vec::new(),
            Err(_) => {
                tracing::debug!("viewport feed closed");
                Vec::new()
            }
        }
    }

    /// Wait for the next measurement. Returns false once the feed is gone.
    ///
    /// Marks the value as seen, so follow with [`Self::apply_current`].
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

fn apply(engine: &mut EngineCore, container: Option<Container>) -> Vec<Action> {
    match container {
        Some(container) => engine.set_container(container),
        None => engine.clear_container(),
    }
}
