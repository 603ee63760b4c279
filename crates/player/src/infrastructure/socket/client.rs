//! Socket client using tokio-tungstenite

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use exeris_protocol::{ClientFrame, GameRequest, RequestError, ServerEvent, ServerFrame};

use super::core::{AckCallback, PendingAcks};
use crate::infrastructure::messaging::EventBus;
use crate::ports::outbound::GameRequestPort;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// Last connect attempt failed
    Failed,
}

/// Socket client for the game server
///
/// Emits made while disconnected fail with [`RequestError::NotConnected`];
/// nothing is queued and nothing is retried. When the connection ends, for
/// whatever reason, every outstanding acknowledgement is dropped and its
/// awaiting request resolves [`RequestError::Cancelled`].
#[derive(Clone)]
pub struct SocketClient {
    url: String,
    reconnect_delay: Duration,
    state: Arc<RwLock<ConnectionState>>,
    tx: Arc<Mutex<Option<mpsc::Sender<String>>>>,
    pending: Arc<Mutex<PendingAcks>>,
    events: EventBus,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    /// Bumped on every connect and disconnect; a read loop only cleans up
    /// after the connection it was started for
    generation: Arc<AtomicU64>,
    reconnect_tx: mpsc::UnboundedSender<()>,
}

impl SocketClient {
    /// Create a client and start its reconnect supervisor.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(url: impl Into<String>, reconnect_delay: Duration, events: EventBus) -> Self {
        let (reconnect_tx, reconnect_rx) = mpsc::unbounded_channel();
        let client = Self {
            url: url.into(),
            reconnect_delay,
            state: Arc::new(RwLock::new(ConnectionState::Disconnected)),
            tx: Arc::new(Mutex::new(None)),
            pending: Arc::new(Mutex::new(PendingAcks::default())),
            events,
            tasks: Arc::new(Mutex::new(Vec::new())),
            generation: Arc::new(AtomicU64::new(0)),
            reconnect_tx,
        };
        tokio::spawn(supervise_reconnects(client.clone(), reconnect_rx));
        client
    }

    pub async fn state(&self) -> ConnectionState {
        *self.state.read().await
    }

    async fn set_state(&self, new_state: ConnectionState) {
        *self.state.write().await = new_state;
    }

    /// Open the socket and start the read and write loops
    pub async fn connect(&self) -> Result<()> {
        self.set_state(ConnectionState::Connecting).await;

        let ws_stream = match connect_async(self.url.as_str()).await {
            Ok((ws_stream, _)) => ws_stream,
            Err(e) => {
                tracing::error!("Failed to connect to game server: {}", e);
                self.set_state(ConnectionState::Failed).await;
                return Err(e.into());
            }
        };
        tracing::info!("Connected to game server at {}", self.url);

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (mut write, mut read) = ws_stream.split();
        let (tx, mut rx) = mpsc::channel::<String>(32);
        *self.tx.lock().await = Some(tx);
        self.set_state(ConnectionState::Connected).await;

        let client = self.clone();
        let read_handle = tokio::spawn(async move {
            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => client.handle_text(&text).await,
                    Ok(Message::Close(_)) => {
                        tracing::info!("Server closed connection");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("Socket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            client.connection_lost(generation).await;
        });

        let write_handle = tokio::spawn(async move {
            while let Some(json) = rx.recv().await {
                if let Err(e) = write.send(Message::Text(json)).await {
                    tracing::warn!("Failed to send frame: {}", e);
                    break;
                }
            }
        });

        self.tasks.lock().await.extend([read_handle, write_handle]);
        Ok(())
    }

    async fn handle_text(&self, text: &str) {
        match ServerFrame::parse(text) {
            Ok(ServerFrame::Ack { ack, args }) => {
                self.pending.lock().await.resolve(ack, args);
            }
            Ok(ServerFrame::Event { event, args }) => match ServerEvent::decode(&event, &args) {
                Ok(ServerEvent::ReconnectRequested) => {
                    tracing::info!("Server requested reconnect");
                    if self.reconnect_tx.send(()).is_err() {
                        tracing::warn!("Reconnect supervisor is gone; staying on this connection");
                    }
                    self.events.dispatch(ServerEvent::ReconnectRequested).await;
                }
                Ok(server_event) => self.events.dispatch(server_event).await,
                Err(e) => tracing::warn!(event = %event, "Malformed server event: {}", e),
            },
            Err(e) => tracing::warn!("Failed to parse server frame: {}", e),
        }
    }

    /// Read loop of connection `generation` ended without a disconnect call
    async fn connection_lost(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            return;
        }
        // Dropping the sender ends the write loop; both handles are detached.
        *self.tx.lock().await = None;
        self.tasks.lock().await.clear();
        self.set_state(ConnectionState::Disconnected).await;
        self.drop_pending("connection lost").await;
    }

    async fn drop_pending(&self, reason: &str) {
        let count = self.pending.lock().await.clear();
        if count > 0 {
            tracing::debug!("Cleared {} pending acknowledgements on {}", count, reason);
        }
    }

    /// Stop both loops and drop every pending acknowledgement
    ///
    /// Callers awaiting a dropped acknowledgement see
    /// [`RequestError::Cancelled`]; plain callbacks are never invoked.
    pub async fn disconnect(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        for handle in self.tasks.lock().await.drain(..) {
            handle.abort();
        }
        *self.tx.lock().await = None;
        self.set_state(ConnectionState::Disconnected).await;
        self.drop_pending("disconnect").await;
    }

    /// Tear down the socket and open it again, once
    pub async fn reconnect(&self) {
        self.disconnect().await;
        tokio::time::sleep(self.reconnect_delay).await;
        if let Err(e) = self.connect().await {
            tracing::warn!("Reconnect failed: {}", e);
        }
    }

    /// Fire-and-forget emit
    pub async fn emit(&self, event: &str, args: Vec<Value>) -> Result<(), RequestError> {
        self.send_frame(event, args, None).await
    }

    /// Emit with a trailing acknowledgement callback
    ///
    /// `on_success` runs only when the server acknowledges with a truthy
    /// success flag, and receives the remaining arguments.
    pub async fn emit_with_ack(
        &self,
        event: &str,
        args: Vec<Value>,
        on_success: impl FnOnce(Vec<Value>) + Send + 'static,
    ) -> Result<(), RequestError> {
        let event_name = event.to_string();
        let callback: AckCallback = Box::new(move |result| match result {
            Ok(args) => on_success(args),
            Err(e) => tracing::debug!(event = %event_name, "Acknowledgement dropped: {}", e),
        });
        self.send_frame(event, args, Some(callback)).await
    }

    async fn send_frame(
        &self,
        event: &str,
        args: Vec<Value>,
        callback: Option<AckCallback>,
    ) -> Result<(), RequestError> {
        // Clone the sender to avoid holding the lock across await
        let tx = self.tx.lock().await.clone();
        let Some(tx) = tx else {
            tracing::debug!(event = %event, "Emit while disconnected");
            return Err(RequestError::NotConnected);
        };

        let ack = match callback {
            Some(callback) => Some(self.pending.lock().await.register(callback)),
            None => None,
        };
        let frame = ClientFrame::Emit {
            event: event.to_string(),
            args,
            ack,
        };
        let sent = match serde_json::to_string(&frame) {
            Ok(json) => tx
                .send(json)
                .await
                .map_err(|e| RequestError::SendFailed(e.to_string())),
            Err(e) => Err(RequestError::Serialization(e.to_string())),
        };
        if sent.is_err() {
            if let Some(ack) = ack {
                self.pending.lock().await.remove(ack);
            }
        }
        sent
    }
}

/// Runs `reconnect` for every reconnect request the read loop forwards
async fn supervise_reconnects(client: SocketClient, mut requests: mpsc::UnboundedReceiver<()>) {
    while requests.recv().await.is_some() {
        client.reconnect().await;
    }
}

#[async_trait]
impl GameRequestPort for SocketClient {
    async fn request(&self, request: GameRequest) -> Result<Vec<Value>, RequestError> {
        let (response_tx, response_rx) = oneshot::channel();
        let callback: AckCallback = Box::new(move |result| {
            let _ = response_tx.send(result);
        });
        self.send_frame(request.event_name(), request.args(), Some(callback))
            .await?;
        response_rx.await.map_err(|_| RequestError::Cancelled)?
    }
}
