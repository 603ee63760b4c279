//! Server pushes

use serde::de::DeserializeOwned;
use serde_json::Value;

use exeris_domain::{CharacterId, EntityId};

/// Pushes the client reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Application-level rejection, shown as a dismissible notification
    ShowError { message: String },
    /// New line for a character's event feed, as server-rendered HTML
    NewEvent {
        character_id: CharacterId,
        html: String,
    },
    /// The character moved; its root entities are stale
    LocationChanged { character_id: CharacterId },
    /// One entity visible to the character changed
    EntityChanged {
        character_id: CharacterId,
        entity_id: EntityId,
    },
    /// Server asks the client to tear down and re-establish the socket
    ReconnectRequested,
    /// Anything else; kept so listeners can log it
    Unknown { event: String },
}

impl ServerEvent {
    pub const SHOW_ERROR: &'static str = "show_error";
    pub const NEW_EVENT: &'static str = "character.new_event";
    pub const LOCATION_CHANGED: &'static str = "character.location_changed";
    pub const ENTITY_CHANGED: &'static str = "character.entity_changed";
    pub const RECONNECT: &'static str = "reconnect";

    /// Decode a pushed event from its name and positional arguments
    pub fn decode(event: &str, args: &[Value]) -> Result<Self, serde_json::Error> {
        Ok(match event {
            Self::SHOW_ERROR => ServerEvent::ShowError {
                message: arg(args, 0)?,
            },
            Self::NEW_EVENT => ServerEvent::NewEvent {
                character_id: arg(args, 0)?,
                html: arg(args, 1)?,
            },
            Self::LOCATION_CHANGED => ServerEvent::LocationChanged {
                character_id: arg(args, 0)?,
            },
            Self::ENTITY_CHANGED => ServerEvent::EntityChanged {
                character_id: arg(args, 0)?,
                entity_id: arg(args, 1)?,
            },
            Self::RECONNECT => ServerEvent::ReconnectRequested,
            other => ServerEvent::Unknown {
                event: other.to_string(),
            },
        })
    }
}

fn arg<T: DeserializeOwned>(args: &[Value], index: usize) -> Result<T, serde_json::Error> {
    T::deserialize(args.get(index).unwrap_or(&Value::Null))
}
