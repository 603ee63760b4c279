//! Event Bus for server pushes.
//!
//! Subscribers register callbacks once; every decoded [`ServerEvent`] is
//! handed to each of them in registration order.

use std::sync::Arc;

use tokio::sync::Mutex;

use exeris_protocol::ServerEvent;

type Subscriber = Box<dyn FnMut(ServerEvent) + Send + 'static>;

/// Event bus for receiving server pushes.
///
/// The bus holds strong references to subscribers, so they persist until
/// cleared or the bus is dropped.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all events.
    pub async fn subscribe(&self, callback: impl FnMut(ServerEvent) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Dispatch an event to all subscribers.
    ///
    /// Called by the socket read loop for every decoded push.
    pub async fn dispatch(&self, event: ServerEvent) {
        let mut subscribers = self.subscribers.lock().await;
        for subscriber in subscribers.iter_mut() {
            subscriber(event.clone());
        }
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    pub async fn clear(&self) {
        self.subscribers.lock().await.clear();
    }
}
