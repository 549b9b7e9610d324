//! Process-wide realtime channel fanning socket events out to screens.
//!
//! One socket connection exists per authenticated session and is shared by
//! every screen. Screens take a [`Subscription`] on mount and drop it on
//! unmount; none of them owns the connection.

use crate::chat_store::ChatPreviewStore;
use friendzone_social::events::ChatEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Broadcast fan-out for decoded socket events.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ChatEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish one event to every live subscriber; returns how many there
    /// were. An event with no listeners is dropped, matching a socket frame
    /// arriving while no screen is mounted.
    pub fn publish(&self, event: ChatEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("realtime event dropped, no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }
}

/// One screen's registration on the event bus. Dropping it deregisters.
pub struct Subscription {
    rx: broadcast::Receiver<ChatEvent>,
}

impl Subscription {
    /// Next event, or `None` once the bus is gone. A subscriber that lagged
    /// behind the buffer logs the loss and keeps reading rather than dying.
    pub async fn next(&mut self) -> Option<ChatEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "subscriber lagged behind realtime buffer");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Forwarding task binding a store to the bus for one screen session.
/// Dropping the binding aborts the task and detaches the store, so rapid
/// mount/unmount churn cannot leak listeners or resurrect dead screens.
pub struct ScreenBinding {
    store: ChatPreviewStore,
    task: JoinHandle<()>,
}

impl Drop for ScreenBinding {
    fn drop(&mut self) {
        self.task.abort();
        self.store.detach();
    }
}

/// Pump events from the bus into a store until the returned binding drops.
pub fn bind_store(bus: &EventBus, store: ChatPreviewStore) -> ScreenBinding {
    let mut subscription = bus.subscribe();
    let pump_store = store.clone();
    let task = tokio::spawn(async move {
        while let Some(event) = subscription.next().await {
            pump_store.apply_event(&event).await;
        }
    });
    ScreenBinding { store, task }
}
