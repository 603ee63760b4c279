//! Acknowledgement payloads and client-side request errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

use exeris_domain::{CharacterId, RawEntity};

/// Answer to `character.get_extended_entity_info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedEntityInfo {
    /// False when the entity is no longer under the asked-about parent
    pub exists: bool,
    #[serde(default)]
    pub entity: Option<RawEntity>,
    #[serde(default)]
    pub children: Vec<RawEntity>,
}

/// One row of `player.get_characters_list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub location_name: Option<String>,
}

/// Client-side request errors
///
/// A request that fails for any of these reasons simply leaves client state
/// unrefreshed; none of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Server acknowledged with a falsy success flag
    #[error("Request rejected by server")]
    Rejected,
    /// No socket at the time of the call
    #[error("Not connected to server")]
    NotConnected,
    /// Pending acknowledgement was dropped (teardown or reconnect)
    #[error("Request was cancelled")]
    Cancelled,
    /// Failed to hand the frame to the socket
    #[error("Failed to send request: {0}")]
    SendFailed(String),
    /// Failed to serialize the frame
    #[error("Serialization error: {0}")]
    Serialization(String),
}
