//! Exeris domain vocabulary.
//!
//! Identifiers, entity records and the domain error type. Pure data, no I/O.

pub mod entity;
pub mod error;
pub mod ids;

pub use entity::{EntityInfo, EntityKind, RawEntity};
pub use error::DomainError;
pub use ids::{CharacterId, EntityId};
