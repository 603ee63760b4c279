//! Entity records.
//!
//! `RawEntity` is what the server sends: activities arrive inline, nested
//! inside the item they belong to. `EntityInfo` is the flat row the client
//! keeps, with activities replaced by id references.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::EntityId;

/// Kind of a visible game object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Location,
    Item,
    Character,
    Activity,
    Combat,
    #[default]
    #[serde(other)]
    Other,
}

/// Entity as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntity {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: EntityKind,
    #[serde(default)]
    pub actions: Vec<Value>,
    /// Inline activity objects (items only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<RawEntity>>,
    /// Any other server-supplied field, kept verbatim
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawEntity {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            actions: Vec::new(),
            activities: None,
            fields: Map::new(),
        }
    }

    pub fn with_activities(mut self, activities: Vec<RawEntity>) -> Self {
        self.activities = Some(activities);
        self
    }
}

/// Flat entity row held by the client
///
/// Rows are replaced wholesale on every refresh; there is no field-level
/// merge, so a field missing from the latest response is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub actions: Vec<Value>,
    /// Activity ids attached to this item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<EntityId>>,
    /// Item an activity row belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<EntityId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntityInfo {
    pub fn is_activity(&self) -> bool {
        self.kind == EntityKind::Activity
    }
}
