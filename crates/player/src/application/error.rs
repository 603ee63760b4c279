//! Service layer error types

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use exeris_protocol::RequestError;

/// Errors that can occur in service operations
///
/// None of these reach the store: a failed call leaves state as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Request failed, was rejected, or its acknowledgement was lost
    #[error("Request error: {0}")]
    Request(#[from] RequestError),
    /// Acknowledgement carried fewer arguments than expected
    #[error("Acknowledgement is missing argument {0}")]
    MissingArgument(usize),
    /// Failed to decode an acknowledgement argument
    #[error("Failed to parse acknowledgement: {0}")]
    ParseError(String),
}

/// Helper trait for decoding acknowledgement arguments into typed data
pub trait ParseAck {
    /// Decode the first argument
    fn parse<T: DeserializeOwned>(self) -> Result<T, ServiceError>;

    /// Decode the first argument, treating a missing or null one as `None`
    fn parse_optional<T: DeserializeOwned>(self) -> Result<Option<T>, ServiceError>;
}

impl ParseAck for Vec<Value> {
    fn parse<T: DeserializeOwned>(self) -> Result<T, ServiceError> {
        let first = self
            .into_iter()
            .next()
            .ok_or(ServiceError::MissingArgument(0))?;
        serde_json::from_value(first).map_err(|e| ServiceError::ParseError(e.to_string()))
    }

    fn parse_optional<T: DeserializeOwned>(self) -> Result<Option<T>, ServiceError> {
        match self.into_iter().next() {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| ServiceError::ParseError(e.to_string())),
        }
    }
}
