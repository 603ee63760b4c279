//! Push-event fan-out.
//!
//! The socket client decodes server pushes and hands them to the
//! [`EventBus`]; application listeners subscribe once at startup.

pub mod event_bus;

pub use event_bus::EventBus;
