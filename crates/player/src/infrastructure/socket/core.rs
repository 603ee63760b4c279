//! Acknowledgement bookkeeping for the socket client.
//!
//! Free of any runtime dependency: the client owns the socket and calls
//! into this for ack ids and success-flag handling.

use std::collections::HashMap;

use serde_json::Value;

use exeris_protocol::{AckId, RequestError};

pub type AckCallback = Box<dyn FnOnce(Result<Vec<Value>, RequestError>) + Send + 'static>;

/// Callbacks waiting for an acknowledgement, keyed by ack id
#[derive(Default)]
pub struct PendingAcks {
    next_id: AckId,
    inner: HashMap<AckId, AckCallback>,
}

impl PendingAcks {
    /// Store a callback and return the ack id to send with the emit
    pub fn register(&mut self, callback: AckCallback) -> AckId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.inner.insert(id, callback);
        id
    }

    pub fn remove(&mut self, ack: AckId) -> bool {
        self.inner.remove(&ack).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Resolve and remove a pending ack.
    ///
    /// The leading success flag is stripped; a falsy or missing flag
    /// resolves the callback with [`RequestError::Rejected`].
    /// Returns true if a pending ack was found.
    pub fn resolve(&mut self, ack: AckId, args: Vec<Value>) -> bool {
        let Some(callback) = self.inner.remove(&ack) else {
            tracing::debug!(ack, "Acknowledgement for unknown emit");
            return false;
        };

        let mut args = args.into_iter();
        let result = match args.next() {
            Some(flag) if is_truthy(&flag) => Ok(args.collect()),
            _ => Err(RequestError::Rejected),
        };
        callback(result);
        true
    }

    /// Drop every pending callback without invoking it
    pub fn clear(&mut self) -> usize {
        let count = self.inner.len();
        self.inner.clear();
        count
    }
}

/// Truthiness of a success flag the way the server's scripting side sees it
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
