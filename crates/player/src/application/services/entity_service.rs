//! Entity Service - action creators for the entity forest
//!
//! Fetches root, inventory and children lists, refreshes single entities in
//! their parent context, and drives expand/collapse and selection.

use std::sync::Arc;

use serde_json::Value;

use exeris_domain::{CharacterId, EntityId, RawEntity};
use exeris_protocol::{ExtendedEntityInfo, GameRequest};

use crate::application::{ParseAck, ServiceError};
use crate::ports::outbound::GameRequestPort;
use crate::state::{Action, EntitiesAction, Placement, Store};

#[derive(Clone)]
pub struct EntityService {
    store: Arc<Store>,
    requests: Arc<dyn GameRequestPort>,
}

impl EntityService {
    pub fn new(store: Arc<Store>, requests: Arc<dyn GameRequestPort>) -> Self {
        Self { store, requests }
    }

    pub async fn fetch_root_entities(&self, character_id: &CharacterId) -> Result<(), ServiceError> {
        let entities: Vec<RawEntity> = self
            .requests
            .request(GameRequest::GetRootEntities {
                character_id: character_id.clone(),
            })
            .await?
            .parse()?;
        self.dispatch(character_id, EntitiesAction::ReplaceRoots { entities });
        Ok(())
    }

    pub async fn fetch_inventory(&self, character_id: &CharacterId) -> Result<(), ServiceError> {
        let entities: Vec<RawEntity> = self
            .requests
            .request(GameRequest::GetInventoryEntities {
                character_id: character_id.clone(),
            })
            .await?
            .parse()?;
        self.dispatch(character_id, EntitiesAction::ReplaceInventory { entities });
        Ok(())
    }

    pub async fn fetch_children(
        &self,
        character_id: &CharacterId,
        parent_id: &EntityId,
    ) -> Result<(), ServiceError> {
        let entities: Vec<RawEntity> = self
            .requests
            .request(GameRequest::GetChildrenEntities {
                character_id: character_id.clone(),
                parent_id: parent_id.clone(),
            })
            .await?
            .parse()?;
        self.dispatch(
            character_id,
            EntitiesAction::ReplaceChildren {
                parent_id: parent_id.clone(),
                entities,
            },
        );
        Ok(())
    }

    /// Refresh one entity in the context it is currently shown in.
    ///
    /// Activities are refreshed through their owning item. An entity the
    /// character no longer sees anywhere is ignored without a request.
    pub async fn request_refresh_entity(
        &self,
        character_id: &CharacterId,
        entity_id: &EntityId,
    ) -> Result<(), ServiceError> {
        let entities = self.store.state().entities_of(character_id);
        let target = entities.refresh_target(entity_id);

        let Some(placement) = entities.locate(&target) else {
            tracing::debug!(
                character_id = %character_id,
                entity_id = %target,
                "Skipping refresh of entity that is not visible"
            );
            return Ok(());
        };

        let parent_id = match &placement {
            Placement::Root => None,
            Placement::Inventory => Some(EntityId::from(character_id)),
            Placement::Under(parent) => Some(parent.clone()),
        };

        let info: ExtendedEntityInfo = self
            .requests
            .request(GameRequest::GetExtendedEntityInfo {
                character_id: character_id.clone(),
                entity_id: target.clone(),
                parent_id,
            })
            .await?
            .parse()?;

        let action = match info {
            ExtendedEntityInfo {
                exists: true,
                entity: Some(entity),
                children,
            } => EntitiesAction::UpsertEntity { entity, children },
            _ => EntitiesAction::RemoveEntity {
                placement,
                entity_id: target,
            },
        };
        self.dispatch(character_id, action);
        Ok(())
    }

    /// Mark an entity expanded and load its children
    pub async fn expand(
        &self,
        character_id: &CharacterId,
        entity_id: &EntityId,
    ) -> Result<(), ServiceError> {
        self.dispatch(
            character_id,
            EntitiesAction::Expand {
                entity_id: entity_id.clone(),
            },
        );
        self.fetch_children(character_id, entity_id).await
    }

    /// Drop the expanded mark; cached children stay
    pub fn collapse(&self, character_id: &CharacterId, entity_id: &EntityId) {
        self.dispatch(
            character_id,
            EntitiesAction::Collapse {
                entity_id: entity_id.clone(),
            },
        );
    }

    /// Select an entity; the first selection loads the details panel
    pub async fn select(
        &self,
        character_id: &CharacterId,
        entity_id: &EntityId,
    ) -> Result<(), ServiceError> {
        let was_empty = self.store.state().entities_of(character_id).selected.is_empty();
        self.dispatch(
            character_id,
            EntitiesAction::Select {
                entity_id: entity_id.clone(),
            },
        );

        let first_selection =
            was_empty && self.store.state().entities_of(character_id).selected.len() == 1;
        if !first_selection {
            return Ok(());
        }

        let details: Value = self
            .requests
            .request(GameRequest::GetEntityDetails {
                character_id: character_id.clone(),
                entity_id: entity_id.clone(),
            })
            .await?
            .parse()?;
        self.dispatch(
            character_id,
            EntitiesAction::SetSelectedDetails {
                details: Some(details),
            },
        );
        Ok(())
    }

    /// Deselect an entity; clearing the last selection clears the details
    pub fn deselect(&self, character_id: &CharacterId, entity_id: &EntityId) {
        self.dispatch(
            character_id,
            EntitiesAction::Deselect {
                entity_id: entity_id.clone(),
            },
        );
        if self.store.state().entities_of(character_id).selected.is_empty() {
            self.dispatch(
                character_id,
                EntitiesAction::SetSelectedDetails { details: None },
            );
        }
    }

    pub fn deselect_all(&self, character_id: &CharacterId) {
        self.dispatch(character_id, EntitiesAction::DeselectAll);
    }

    /// Start a multi-step entity action; resets any detail already entered
    pub fn set_action_type(&self, character_id: &CharacterId, action_type: Option<String>) {
        self.dispatch(character_id, EntitiesAction::SetActionType { action_type });
    }

    pub fn set_action_detail(&self, character_id: &CharacterId, detail: Option<Value>) {
        self.dispatch(character_id, EntitiesAction::SetActionDetail { detail });
    }

    /// Execute an entity action, then refresh the entity it touched
    pub async fn perform_entity_action(
        &self,
        character_id: &CharacterId,
        entity_id: &EntityId,
        action: &str,
        payload: Value,
    ) -> Result<(), ServiceError> {
        self.requests
            .request(GameRequest::PerformEntityAction {
                character_id: character_id.clone(),
                entity_id: entity_id.clone(),
                action: action.to_string(),
                payload,
            })
            .await?;
        self.set_action_type(character_id, None);
        self.request_refresh_entity(character_id, entity_id).await
    }

    fn dispatch(&self, character_id: &CharacterId, action: EntitiesAction) {
        self.store.dispatch(Action::entities(character_id, action));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::recording_store;
    use crate::ports::outbound::MockGameRequestPort;
    use exeris_domain::EntityKind;
    use exeris_protocol::RequestError;
    use serde_json::json;

    fn character() -> CharacterId {
        CharacterId::from(1u64)
    }

    fn service(store: &Arc<Store>, requests: MockGameRequestPort) -> EntityService {
        EntityService::new(Arc::clone(store), Arc::new(requests))
    }

    fn seed(store: &Store, action: EntitiesAction) {
        store.dispatch(Action::entities(&character(), action));
    }

    fn item(id: u64) -> RawEntity {
        RawEntity::new(id, format!("item {id}"), EntityKind::Item)
    }

    #[tokio::test]
    async fn fetch_roots_stores_ids_in_order_and_flattens_activities() {
        let (store, _) = recording_store();
        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .withf(|req| matches!(req, GameRequest::GetRootEntities { .. }))
            .times(1)
            .returning(|_| {
                Ok(vec![json!([
                    {"id": 1, "name": "Forest", "type": "location"},
                    {"id": 2, "name": "Loom", "type": "item",
                     "activities": [{"id": "a1", "name": "Weaving", "type": "activity"}]}
                ])])
            });

        service(&store, requests)
            .fetch_root_entities(&character())
            .await
            .unwrap();

        let entities = store.state().entities_of(&character());
        assert_eq!(entities.roots, vec![EntityId::from(1u64), EntityId::from(2u64)]);
        assert_eq!(
            entities.info(&EntityId::from(2u64)).unwrap().activities,
            Some(vec![EntityId::from("a1")])
        );
        assert!(entities.info(&EntityId::from("a1")).is_some());
    }

    #[tokio::test]
    async fn refresh_of_invisible_entity_issues_nothing() {
        let (store, log) = recording_store();
        let mut requests = MockGameRequestPort::new();
        requests.expect_request().times(0);

        service(&store, requests)
            .request_refresh_entity(&character(), &EntityId::from(99u64))
            .await
            .unwrap();

        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn refresh_of_activity_targets_item_in_grandparent_context() {
        let (store, _) = recording_store();
        seed(
            &store,
            EntitiesAction::ReplaceChildren {
                parent_id: EntityId::from(10u64),
                entities: vec![item(2).with_activities(vec![RawEntity::new(
                    "a1",
                    "Weaving",
                    EntityKind::Activity,
                )])],
            },
        );

        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .withf(|req| {
                *req == GameRequest::GetExtendedEntityInfo {
                    character_id: CharacterId::from(1u64),
                    entity_id: EntityId::from(2u64),
                    parent_id: Some(EntityId::from(10u64)),
                }
            })
            .times(1)
            .returning(|_| {
                Ok(vec![json!({
                    "exists": true,
                    "entity": {"id": 2, "name": "Loom", "type": "item", "activities": []},
                    "children": []
                })])
            });

        service(&store, requests)
            .request_refresh_entity(&character(), &EntityId::from("a1"))
            .await
            .unwrap();

        let entities = store.state().entities_of(&character());
        assert_eq!(
            entities.info(&EntityId::from(2u64)).unwrap().activities,
            Some(vec![])
        );
        assert!(entities.info(&EntityId::from("a1")).is_none());
    }

    #[tokio::test]
    async fn refresh_of_inventory_item_passes_character_as_parent() {
        let (store, _) = recording_store();
        seed(
            &store,
            EntitiesAction::ReplaceInventory {
                entities: vec![item(5)],
            },
        );

        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .withf(|req| {
                matches!(
                    req,
                    GameRequest::GetExtendedEntityInfo { parent_id: Some(parent), .. }
                        if *parent == EntityId::from(1u64)
                )
            })
            .times(1)
            .returning(|_| {
                Ok(vec![json!({
                    "exists": true,
                    "entity": {"id": 5, "name": "Bag", "type": "item"},
                    "children": [{"id": 6, "name": "Coin", "type": "item"}]
                })])
            });

        service(&store, requests)
            .request_refresh_entity(&character(), &EntityId::from(5u64))
            .await
            .unwrap();

        let entities = store.state().entities_of(&character());
        assert_eq!(entities.info(&EntityId::from(5u64)).unwrap().name, "Bag");
        assert_eq!(entities.children_of(&EntityId::from(5u64)), &[EntityId::from(6u64)]);
    }

    #[tokio::test]
    async fn refresh_of_root_entity_passes_null_parent() {
        let (store, _) = recording_store();
        seed(
            &store,
            EntitiesAction::ReplaceRoots {
                entities: vec![RawEntity::new(3u64, "Forest", EntityKind::Location)],
            },
        );

        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .withf(|req| {
                matches!(
                    req,
                    GameRequest::GetExtendedEntityInfo { parent_id: None, .. }
                )
            })
            .times(1)
            .returning(|_| Ok(vec![json!({"exists": false})]));

        service(&store, requests)
            .request_refresh_entity(&character(), &EntityId::from(3u64))
            .await
            .unwrap();

        assert!(store.state().entities_of(&character()).roots.is_empty());
    }

    #[tokio::test]
    async fn vanished_entity_is_removed_from_its_parent() {
        let (store, log) = recording_store();
        seed(
            &store,
            EntitiesAction::ReplaceChildren {
                parent_id: EntityId::from(10u64),
                entities: vec![item(1), item(2)],
            },
        );
        log.lock().unwrap().clear();

        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .times(1)
            .returning(|_| Ok(vec![json!({"exists": false})]));

        service(&store, requests)
            .request_refresh_entity(&character(), &EntityId::from(1u64))
            .await
            .unwrap();

        assert_eq!(
            store
                .state()
                .entities_of(&character())
                .children_of(&EntityId::from(10u64)),
            &[EntityId::from(2u64)]
        );
        assert_eq!(
            *log.lock().unwrap(),
            vec![Action::entities(
                &character(),
                EntitiesAction::RemoveEntity {
                    placement: Placement::Under(EntityId::from(10u64)),
                    entity_id: EntityId::from(1u64),
                }
            )]
        );
    }

    #[tokio::test]
    async fn failed_refresh_leaves_state_alone() {
        let (store, log) = recording_store();
        seed(
            &store,
            EntitiesAction::ReplaceInventory {
                entities: vec![item(5)],
            },
        );
        log.lock().unwrap().clear();

        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .times(1)
            .returning(|_| Err(RequestError::Rejected));

        let result = service(&store, requests)
            .request_refresh_entity(&character(), &EntityId::from(5u64))
            .await;

        assert_eq!(result, Err(ServiceError::Request(RequestError::Rejected)));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(
            store.state().entities_of(&character()).inventory,
            vec![EntityId::from(5u64)]
        );
    }

    #[tokio::test]
    async fn expand_marks_and_fetches_children() {
        let (store, _) = recording_store();
        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .withf(|req| {
                matches!(
                    req,
                    GameRequest::GetChildrenEntities { parent_id, .. }
                        if *parent_id == EntityId::from(7u64)
                )
            })
            .times(1)
            .returning(|_| Ok(vec![json!([{"id": 8, "name": "Key", "type": "item"}])]));

        service(&store, requests)
            .expand(&character(), &EntityId::from(7u64))
            .await
            .unwrap();

        let entities = store.state().entities_of(&character());
        assert!(entities.is_expanded(&EntityId::from(7u64)));
        assert_eq!(entities.children_of(&EntityId::from(7u64)), &[EntityId::from(8u64)]);
    }

    #[tokio::test]
    async fn collapse_issues_no_request() {
        let (store, _) = recording_store();
        let mut requests = MockGameRequestPort::new();
        requests.expect_request().times(0);

        service(&store, requests).collapse(&character(), &EntityId::from(7u64));

        assert!(!store
            .state()
            .entities_of(&character())
            .is_expanded(&EntityId::from(7u64)));
    }

    #[tokio::test]
    async fn only_first_selection_fetches_details() {
        let (store, log) = recording_store();
        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .withf(|req| {
                matches!(
                    req,
                    GameRequest::GetEntityDetails { entity_id, .. }
                        if *entity_id == EntityId::from(1u64)
                )
            })
            .times(1)
            .returning(|_| Ok(vec![json!({"name": "Rock"})]));
        let service = service(&store, requests);

        service.select(&character(), &EntityId::from(1u64)).await.unwrap();
        service.select(&character(), &EntityId::from(2u64)).await.unwrap();

        let detail_dispatches = log
            .lock()
            .unwrap()
            .iter()
            .filter(|action| {
                matches!(
                    action,
                    Action::Entities {
                        action: EntitiesAction::SetSelectedDetails { .. },
                        ..
                    }
                )
            })
            .count();
        assert_eq!(detail_dispatches, 1);
        assert_eq!(
            store.state().entities_of(&character()).selected_details,
            Some(json!({"name": "Rock"}))
        );
    }

    #[tokio::test]
    async fn deselecting_last_entity_clears_details() {
        let (store, log) = recording_store();
        seed(
            &store,
            EntitiesAction::Select {
                entity_id: EntityId::from(1u64),
            },
        );
        seed(
            &store,
            EntitiesAction::SetSelectedDetails {
                details: Some(json!({"name": "Rock"})),
            },
        );
        log.lock().unwrap().clear();
        let service = service(&store, MockGameRequestPort::new());

        service.deselect(&character(), &EntityId::from(1u64));

        assert_eq!(
            log.lock().unwrap().last(),
            Some(&Action::entities(
                &character(),
                EntitiesAction::SetSelectedDetails { details: None }
            ))
        );
        assert_eq!(store.state().entities_of(&character()).selected_details, None);
    }

    #[tokio::test]
    async fn deselecting_one_of_two_keeps_details() {
        let (store, log) = recording_store();
        seed(
            &store,
            EntitiesAction::Select {
                entity_id: EntityId::from(1u64),
            },
        );
        seed(
            &store,
            EntitiesAction::Select {
                entity_id: EntityId::from(2u64),
            },
        );
        log.lock().unwrap().clear();

        service(&store, MockGameRequestPort::new()).deselect(&character(), &EntityId::from(1u64));

        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn performed_action_clears_workflow_and_refreshes() {
        let (store, _) = recording_store();
        seed(
            &store,
            EntitiesAction::ReplaceInventory {
                entities: vec![item(5)],
            },
        );
        seed(
            &store,
            EntitiesAction::SetActionType {
                action_type: Some("eat".into()),
            },
        );

        let mut requests = MockGameRequestPort::new();
        requests
            .expect_request()
            .withf(|req| matches!(req, GameRequest::PerformEntityAction { action, .. } if action == "eat"))
            .times(1)
            .returning(|_| Ok(vec![]));
        requests
            .expect_request()
            .withf(|req| matches!(req, GameRequest::GetExtendedEntityInfo { .. }))
            .times(1)
            .returning(|_| Ok(vec![json!({"exists": false})]));

        service(&store, requests)
            .perform_entity_action(&character(), &EntityId::from(5u64), "eat", json!({}))
            .await
            .unwrap();

        let entities = store.state().entities_of(&character());
        assert_eq!(entities.action_type, None);
        assert!(entities.inventory.is_empty());
    }
}
