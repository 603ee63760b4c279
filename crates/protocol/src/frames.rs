//! JSON frames exchanged over the socket.
//!
//! One text message carries exactly one frame.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Correlates an acknowledgement with the emit that asked for it
pub type AckId = u64;

/// Frames sent by the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Emit {
        event: String,
        #[serde(default)]
        args: Vec<Value>,
        /// Present when the caller wants an acknowledgement
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ack: Option<AckId>,
    },
}

/// Frames sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Reply to an emit; `args[0]` is the success flag
    Ack {
        ack: AckId,
        #[serde(default)]
        args: Vec<Value>,
    },
    /// Unsolicited push
    Event {
        event: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

impl ServerFrame {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
