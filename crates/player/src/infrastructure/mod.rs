pub mod messaging;
pub mod socket;

pub use messaging::EventBus;
pub use socket::{ConnectionState, SocketClient};
