//! Server push listeners
//!
//! Registered once at startup. Pushes that only touch local state are
//! applied in arrival order; pushes that need a request run on their own
//! task so a slow acknowledgement never holds up the feed.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use exeris_protocol::ServerEvent;

use super::Services;
use crate::infrastructure::messaging::EventBus;

#[derive(Clone)]
pub struct PushHandler {
    services: Services,
}

impl PushHandler {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub async fn handle(&self, event: ServerEvent) {
        match event {
            ServerEvent::ShowError { message } => self.services.notifications.show_error(message),
            ServerEvent::NewEvent { character_id, html } => {
                self.services.event_feed.receive(&character_id, &html)
            }
            ServerEvent::LocationChanged { character_id } => {
                if let Err(e) = self
                    .services
                    .entities
                    .fetch_root_entities(&character_id)
                    .await
                {
                    tracing::debug!(character_id = %character_id, "Root refresh dropped: {}", e);
                }
            }
            ServerEvent::EntityChanged {
                character_id,
                entity_id,
            } => {
                if let Err(e) = self
                    .services
                    .entities
                    .request_refresh_entity(&character_id, &entity_id)
                    .await
                {
                    tracing::debug!(
                        character_id = %character_id,
                        entity_id = %entity_id,
                        "Entity refresh dropped: {}",
                        e
                    );
                }
            }
            // The socket client reconnects on its own
            ServerEvent::ReconnectRequested => {}
            ServerEvent::Unknown { event } => {
                tracing::debug!(event = %event, "Ignoring unhandled server push");
            }
        }
    }
}

fn issues_request(event: &ServerEvent) -> bool {
    matches!(
        event,
        ServerEvent::LocationChanged { .. } | ServerEvent::EntityChanged { .. }
    )
}

/// Subscribe the push handler to `bus` and start its worker task
pub async fn register_push_handlers(bus: &EventBus, services: Services) -> JoinHandle<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    bus.subscribe(move |event| {
        if tx.send(event).is_err() {
            tracing::debug!("Push worker stopped; dropping event");
        }
    })
    .await;

    let handler = PushHandler::new(services);
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if issues_request(&event) {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(event).await });
            } else {
                handler.handle(event).await;
            }
        }
    })
}
