//! Top panel service - opens, refreshes and closes the detail panel

use std::sync::Arc;

use serde_json::Value;

use exeris_domain::{CharacterId, EntityId};
use exeris_protocol::GameRequest;

use crate::application::{ParseAck, ServiceError};
use crate::ports::outbound::GameRequestPort;
use crate::state::{Action, Store, TopPanel, TopPanelAction};

#[derive(Clone)]
pub struct TopPanelService {
    store: Arc<Store>,
    requests: Arc<dyn GameRequestPort>,
}

impl TopPanelService {
    pub fn new(store: Arc<Store>, requests: Arc<dyn GameRequestPort>) -> Self {
        Self { store, requests }
    }

    pub async fn show_character_details(
        &self,
        character_id: &CharacterId,
        target_id: &EntityId,
    ) -> Result<(), ServiceError> {
        let details: Value = self
            .requests
            .request(GameRequest::GetCharacterDetails {
                character_id: character_id.clone(),
                target_id: target_id.clone(),
            })
            .await?
            .parse()?;
        self.dispatch(
            character_id,
            TopPanelAction::ApplyCharacterDetails {
                target_id: target_id.clone(),
                details,
            },
        );
        Ok(())
    }

    pub async fn show_combat_details(
        &self,
        character_id: &CharacterId,
        target_id: &EntityId,
    ) -> Result<(), ServiceError> {
        let details: Value = self
            .requests
            .request(GameRequest::GetCombatDetails {
                character_id: character_id.clone(),
                target_id: target_id.clone(),
            })
            .await?
            .parse()?;
        self.dispatch(
            character_id,
            TopPanelAction::ApplyCombatDetails {
                target_id: target_id.clone(),
                details,
            },
        );
        Ok(())
    }

    pub fn close(&self, character_id: &CharacterId) {
        self.dispatch(character_id, TopPanelAction::Close);
    }

    pub fn set_modifier(&self, character_id: &CharacterId, key: impl Into<String>, value: Value) {
        self.dispatch(
            character_id,
            TopPanelAction::SetModifier {
                key: key.into(),
                value,
            },
        );
    }

    pub fn remove_modifier(&self, character_id: &CharacterId, key: impl Into<String>) {
        self.dispatch(character_id, TopPanelAction::RemoveModifier { key: key.into() });
    }

    /// Re-fetch details for the open panel if it shows `entity_id`
    pub async fn refresh_open_panel(
        &self,
        character_id: &CharacterId,
        entity_id: &EntityId,
    ) -> Result<(), ServiceError> {
        let panel = self.store.state().top_panel_of(character_id).panel.clone();
        match panel {
            TopPanel::Character(target) if target == *entity_id => {
                self.show_character_details(character_id, &target).await
            }
            TopPanel::Combat(target) if target == *entity_id => {
                self.show_combat_details(character_id, &target).await
            }
            _ => Ok(()),
        }
    }

    fn dispatch(&self, character_id: &CharacterId, action: TopPanelAction) {
        self.store.dispatch(Action::top_panel(character_id, action));
    }
}
