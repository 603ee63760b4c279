//! Game Request Port - acknowledgement-style calls to the game server
//!
//! The wire types (`GameRequest`, `RequestError`) come straight from the
//! protocol crate: they must match the server exactly, so there is no
//! separate client-side model of them.
//!
//! Note: uses `async_trait` instead of returning `Pin<Box<dyn Future>>` for
//! mockall compatibility.

use async_trait::async_trait;
use serde_json::Value;

use exeris_protocol::{GameRequest, RequestError};

/// Port for request/acknowledgement operations
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait GameRequestPort: Send + Sync {
    /// Emit a call and wait for its acknowledgement.
    ///
    /// # Returns
    /// * `Ok(args)` - acknowledgement arguments after the leading success flag
    /// * `Err(RequestError::Rejected)` - the success flag was falsy
    /// * `Err(_)` - the call never reached the server or its ack was lost
    ///
    /// There is no timeout: an acknowledgement that never arrives leaves the
    /// future pending until the connection is torn down.
    async fn request(&self, request: GameRequest) -> Result<Vec<Value>, RequestError>;
}
