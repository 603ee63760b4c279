//! Exeris Player - client core.
//!
//! State lives in one [`state::Store`]; application services are the only
//! code that talks to the server, through [`ports::outbound::GameRequestPort`].
//! The socket transport and push fan-out live under `infrastructure`.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod markup;
pub mod ports;
pub mod state;

pub use application::Services;
pub use config::{ClientConfig, ConfigError};
pub use state::{Action, RootState, Store};
