//! Socket transport for the game server
//!
//! - `core`: acknowledgement tracking and success-flag handling
//! - `client`: tokio-tungstenite connection, emit/ack, reconnect

mod client;
mod core;

pub use client::{ConnectionState, SocketClient};
pub use self::core::{AckCallback, PendingAcks};
