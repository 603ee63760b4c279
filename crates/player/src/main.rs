//! Exeris Player - composition root binary.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exeris_player::application::push::register_push_handlers;
use exeris_player::infrastructure::{EventBus, SocketClient};
use exeris_player::ports::outbound::GameRequestPort;
use exeris_player::{ClientConfig, Services, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "exeris_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Exeris Player");

    let config = ClientConfig::from_env().context("invalid client configuration")?;

    let store = Arc::new(Store::new());

    let events = EventBus::new();
    let socket = SocketClient::new(
        config.server_url.as_str(),
        config.reconnect_delay,
        events.clone(),
    );
    let requests: Arc<dyn GameRequestPort> = Arc::new(socket.clone());
    let services = Services::new(Arc::clone(&store), requests);

    let push_worker = register_push_handlers(&events, services.clone()).await;
    socket.connect().await?;

    if let Err(e) = services.characters.fetch_characters_list().await {
        tracing::warn!("Could not load characters list: {}", e);
    }

    if let Some(character_id) = &config.character_id {
        tracing::info!(character_id = %character_id, "Opening character session");
        if let Err(e) = services.entities.fetch_root_entities(character_id).await {
            tracing::warn!("Could not load root entities: {}", e);
        }
        if let Err(e) = services.entities.fetch_inventory(character_id).await {
            tracing::warn!("Could not load inventory: {}", e);
        }
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    socket.disconnect().await;
    events.clear().await;
    push_worker.abort();
    Ok(())
}
