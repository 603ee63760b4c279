//! Exeris Protocol - wire contract shared with the game server
//!
//! - `requests`: typed acknowledgement calls, each pinned to an event name and
//!   a positional argument order
//! - `frames`: JSON frames carried over the socket
//! - `events`: server pushes
//! - `responses`: acknowledgement payload DTOs and client-side request errors
//!
//! The server owns this contract; nothing here may be renamed or reordered.

pub mod events;
pub mod frames;
pub mod requests;
pub mod responses;

pub use events::ServerEvent;
pub use frames::{AckId, ClientFrame, ServerFrame};
pub use requests::GameRequest;
pub use responses::{CharacterSummary, ExtendedEntityInfo, RequestError};
