//! Application layer - action creators over the store and the request port

pub mod error;
pub mod push;
pub mod services;

pub use error::{ParseAck, ServiceError};
pub use services::Services;
