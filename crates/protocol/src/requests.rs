//! Acknowledgement-style calls the client can issue.
//!
//! Every call is emitted as `emit(event, ...args, ack)`. Character-scoped
//! calls always pass the observing character first.

use serde_json::Value;

use exeris_domain::{CharacterId, EntityId};

/// All calls that expect an acknowledgement
#[derive(Debug, Clone, PartialEq)]
pub enum GameRequest {
    // =========================================================================
    // Entity tree
    // =========================================================================
    /// Top-level entities around the character (locations it stands in)
    GetRootEntities { character_id: CharacterId },

    /// Entities the character carries
    GetInventoryEntities { character_id: CharacterId },

    /// Children of an expanded entity
    GetChildrenEntities {
        character_id: CharacterId,
        parent_id: EntityId,
    },

    /// Fresh info for one entity in a given parent context
    ///
    /// `parent_id` is `None` for root entities and the character itself for
    /// inventory entities.
    GetExtendedEntityInfo {
        character_id: CharacterId,
        entity_id: EntityId,
        parent_id: Option<EntityId>,
    },

    /// Full details for the selection side panel
    GetEntityDetails {
        character_id: CharacterId,
        entity_id: EntityId,
    },

    /// Execute one of the entity's actions
    PerformEntityAction {
        character_id: CharacterId,
        entity_id: EntityId,
        action: String,
        payload: Value,
    },

    // =========================================================================
    // Naming
    // =========================================================================
    RenameEntity {
        character_id: CharacterId,
        entity_id: EntityId,
        name: String,
    },

    GetDynamicName {
        character_id: CharacterId,
        entity_id: EntityId,
    },

    // =========================================================================
    // Top panel
    // =========================================================================
    GetCharacterDetails {
        character_id: CharacterId,
        target_id: EntityId,
    },

    GetCombatDetails {
        character_id: CharacterId,
        target_id: EntityId,
    },

    // =========================================================================
    // Player
    // =========================================================================
    GetCharactersList,
}

impl GameRequest {
    /// Event name the server listens on
    pub fn event_name(&self) -> &'static str {
        match self {
            GameRequest::GetRootEntities { .. } => "character.get_root_entities",
            GameRequest::GetInventoryEntities { .. } => "character.get_inventory_entities",
            GameRequest::GetChildrenEntities { .. } => "character.get_children_entities",
            GameRequest::GetExtendedEntityInfo { .. } => "character.get_extended_entity_info",
            GameRequest::GetEntityDetails { .. } => "character.get_entity_details",
            GameRequest::PerformEntityAction { .. } => "character.perform_entity_action",
            GameRequest::RenameEntity { .. } => "character.rename_entity",
            GameRequest::GetDynamicName { .. } => "character.get_dynamic_name",
            GameRequest::GetCharacterDetails { .. } => "character.get_character_details",
            GameRequest::GetCombatDetails { .. } => "character.get_combat_details",
            GameRequest::GetCharactersList => "player.get_characters_list",
        }
    }

    /// Positional arguments, in the order the server expects them
    pub fn args(&self) -> Vec<Value> {
        match self {
            GameRequest::GetRootEntities { character_id }
            | GameRequest::GetInventoryEntities { character_id } => {
                vec![character_id.to_json()]
            }
            GameRequest::GetChildrenEntities {
                character_id,
                parent_id,
            } => vec![character_id.to_json(), parent_id.to_json()],
            GameRequest::GetExtendedEntityInfo {
                character_id,
                entity_id,
                parent_id,
            } => vec![
                character_id.to_json(),
                entity_id.to_json(),
                parent_id.as_ref().map_or(Value::Null, EntityId::to_json),
            ],
            GameRequest::GetEntityDetails {
                character_id,
                entity_id,
            }
            | GameRequest::GetDynamicName {
                character_id,
                entity_id,
            } => vec![character_id.to_json(), entity_id.to_json()],
            GameRequest::PerformEntityAction {
                character_id,
                entity_id,
                action,
                payload,
            } => vec![
                character_id.to_json(),
                entity_id.to_json(),
                Value::String(action.clone()),
                payload.clone(),
            ],
            GameRequest::RenameEntity {
                character_id,
                entity_id,
                name,
            } => vec![
                character_id.to_json(),
                entity_id.to_json(),
                Value::String(name.clone()),
            ],
            GameRequest::GetCharacterDetails {
                character_id,
                target_id,
            }
            | GameRequest::GetCombatDetails {
                character_id,
                target_id,
            } => vec![character_id.to_json(), target_id.to_json()],
            GameRequest::GetCharactersList => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extended_info_passes_null_parent_for_roots() {
        let request = GameRequest::GetExtendedEntityInfo {
            character_id: CharacterId::from(3u64),
            entity_id: EntityId::from("loc-1"),
            parent_id: None,
        };

        assert_eq!(request.event_name(), "character.get_extended_entity_info");
        assert_eq!(request.args(), vec![json!(3), json!("loc-1"), Value::Null]);
    }

    #[test]
    fn perform_action_keeps_argument_order() {
        let request = GameRequest::PerformEntityAction {
            character_id: CharacterId::from(3u64),
            entity_id: EntityId::from(9u64),
            action: "take".into(),
            payload: json!({"amount": 2}),
        };

        assert_eq!(
            request.args(),
            vec![json!(3), json!(9), json!("take"), json!({"amount": 2})]
        );
    }

    #[test]
    fn characters_list_has_no_arguments() {
        assert!(GameRequest::GetCharactersList.args().is_empty());
        assert_eq!(
            GameRequest::GetCharactersList.event_name(),
            "player.get_characters_list"
        );
    }
}
