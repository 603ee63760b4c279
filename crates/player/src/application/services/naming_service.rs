//! Naming service - renames and dynamic-name lookups

use std::sync::Arc;

use exeris_domain::{CharacterId, EntityId};
use exeris_protocol::GameRequest;

use super::TopPanelService;
use crate::application::{ParseAck, ServiceError};
use crate::ports::outbound::GameRequestPort;
use crate::state::{Action, DynamicNameAction, Store};

#[derive(Clone)]
pub struct NamingService {
    store: Arc<Store>,
    requests: Arc<dyn GameRequestPort>,
    top_panel: TopPanelService,
}

impl NamingService {
    pub fn new(
        store: Arc<Store>,
        requests: Arc<dyn GameRequestPort>,
        top_panel: TopPanelService,
    ) -> Self {
        Self {
            store,
            requests,
            top_panel,
        }
    }

    /// Give an entity a new name as seen by `character_id`
    ///
    /// An open top panel showing the renamed entity is fetched again so it
    /// shows the new name.
    pub async fn rename_entity(
        &self,
        character_id: &CharacterId,
        entity_id: &EntityId,
        name: &str,
    ) -> Result<(), ServiceError> {
        self.requests
            .request(GameRequest::RenameEntity {
                character_id: character_id.clone(),
                entity_id: entity_id.clone(),
                name: name.to_string(),
            })
            .await?;
        self.update_cache(character_id, entity_id, name.to_string());
        self.top_panel
            .refresh_open_panel(character_id, entity_id)
            .await
    }

    /// Ask the server what `character_id` calls `entity_id`
    ///
    /// A null answer leaves the cached name in place.
    pub async fn refresh_dynamic_name(
        &self,
        character_id: &CharacterId,
        entity_id: &EntityId,
    ) -> Result<(), ServiceError> {
        let name: Option<String> = self
            .requests
            .request(GameRequest::GetDynamicName {
                character_id: character_id.clone(),
                entity_id: entity_id.clone(),
            })
            .await?
            .parse_optional()?;
        match name {
            Some(name) => self.update_cache(character_id, entity_id, name),
            None => tracing::debug!(
                character_id = %character_id,
                entity_id = %entity_id,
                "No dynamic name known; keeping cached one"
            ),
        }
        Ok(())
    }

    fn update_cache(&self, character_id: &CharacterId, entity_id: &EntityId, name: String) {
        self.store.dispatch(Action::dynamic_names(
            character_id,
            DynamicNameAction::Update {
                entity_id: entity_id.clone(),
                name,
            },
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::recording_store;
    use crate::ports::outbound::MockGameRequestPort;
    use crate::state::TopPanelAction;
    use mockall::Sequence;
    use serde_json::json;

    fn character() -> CharacterId {
        CharacterId::from(1u64)
    }

    fn naming(store: &Arc<Store>, requests: MockGameRequestPort) -> NamingService {
        let requests: Arc<dyn GameRequestPort> = Arc::new(requests);
        let top_panel = TopPanelService::new(Arc::clone(store), Arc::clone(&requests));
        NamingService::new(Arc::clone(store), requests, top_panel)
    }

    #[tokio::test]
    async fn rename_refetches_open_panel_for_same_target() {
        let (store, _) = recording_store();
        store.dispatch(Action::top_panel(
            &character(),
            TopPanelAction::ApplyCharacterDetails {
                target_id: EntityId::from(9u64),
                details: json!({"name": "stranger"}),
            },
        ));

        let mut seq = Sequence::new();
        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .withf(|req| matches!(req, GameRequest::RenameEntity { name, .. } if name == "Bob"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![]));
        requests
            .expect_request()
            .withf(|req| {
                matches!(
                    req,
                    GameRequest::GetCharacterDetails { target_id, .. }
                        if *target_id == EntityId::from(9u64)
                )
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![json!({"name": "Bob"})]));

        naming(&store, requests)
            .rename_entity(&character(), &EntityId::from(9u64), "Bob")
            .await
            .unwrap();

        let state = store.state();
        assert_eq!(
            state
                .dynamic_names_of(&character())
                .name_of(&EntityId::from(9u64)),
            Some("Bob")
        );
        assert_eq!(
            state.top_panel_of(&character()).details,
            Some(json!({"name": "Bob"}))
        );
    }

    #[tokio::test]
    async fn rename_with_closed_panel_issues_one_request() {
        let (store, _) = recording_store();
        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .times(1)
            .returning(|_| Ok(vec![]));

        naming(&store, requests)
            .rename_entity(&character(), &EntityId::from(9u64), "Bob")
            .await
            .unwrap();

        assert_eq!(
            store
                .state()
                .dynamic_names_of(&character())
                .name_of(&EntityId::from(9u64)),
            Some("Bob")
        );
    }

    #[tokio::test]
    async fn dynamic_name_is_cached_per_observer() {
        let (store, _) = recording_store();
        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .returning(|_| Ok(vec![json!("tall man")]));

        naming(&store, requests)
            .refresh_dynamic_name(&character(), &EntityId::from(9u64))
            .await
            .unwrap();

        let state = store.state();
        assert_eq!(
            state
                .dynamic_names_of(&character())
                .name_of(&EntityId::from(9u64)),
            Some("tall man")
        );
        assert!(state
            .dynamic_names_of(&CharacterId::from(2u64))
            .is_empty());
    }

    #[tokio::test]
    async fn null_dynamic_name_keeps_cached_name() {
        let (store, log) = recording_store();
        store.dispatch(Action::dynamic_names(
            &character(),
            DynamicNameAction::Update {
                entity_id: EntityId::from(9u64),
                name: "Bob".into(),
            },
        ));
        log.lock().unwrap().clear();
        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .times(1)
            .returning(|_| Ok(vec![serde_json::Value::Null]));

        naming(&store, requests)
            .refresh_dynamic_name(&character(), &EntityId::from(9u64))
            .await
            .unwrap();

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(
            store
                .state()
                .dynamic_names_of(&character())
                .name_of(&EntityId::from(9u64)),
            Some("Bob")
        );
    }
}
