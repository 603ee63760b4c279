//! Last-known display names of dynamic-nameable entities, per observer.

use std::collections::HashMap;
use std::sync::Arc;

use exeris_domain::EntityId;

use super::keyed::Reducer;
use super::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicNameAction {
    Update { entity_id: EntityId, name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicNameCache {
    names: HashMap<EntityId, String>,
}

impl DynamicNameCache {
    pub fn name_of(&self, entity_id: &EntityId) -> Option<&str> {
        self.names.get(entity_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicNameReducer;

impl Reducer for DynamicNameReducer {
    type State = DynamicNameCache;
    type Action = Action;

    fn reduce(&self, state: &Arc<DynamicNameCache>, action: &Action) -> Arc<DynamicNameCache> {
        match action {
            Action::DynamicNames {
                action: DynamicNameAction::Update { entity_id, name },
                ..
            } => {
                let mut next = DynamicNameCache::clone(state);
                next.names.insert(entity_id.clone(), name.clone());
                Arc::new(next)
            }
            _ => Arc::clone(state),
        }
    }
}
