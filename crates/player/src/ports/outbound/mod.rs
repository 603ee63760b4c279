//! Outbound ports
//!
//! Traits the application services call out through. The socket transport
//! implements them; tests substitute mocks.

pub mod request_port;

pub use request_port::GameRequestPort;

#[cfg(any(test, feature = "testing"))]
pub use request_port::MockGameRequestPort;
