//! Entity forest for one character.
//!
//! Holds what the character currently sees: the root list, the inventory,
//! a parent → children adjacency map and the flat info table, plus UI marks
//! (expanded, selected) and the pending entity-action workflow.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;

use exeris_domain::{EntityId, EntityInfo, RawEntity};

use super::keyed::Reducer;
use super::normalize::{flatten, flatten_all};
use super::Action;

/// Where an entity sits in the visible tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Placement {
    Root,
    Inventory,
    Under(EntityId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntitiesAction {
    ReplaceRoots {
        entities: Vec<RawEntity>,
    },
    ReplaceInventory {
        entities: Vec<RawEntity>,
    },
    ReplaceChildren {
        parent_id: EntityId,
        entities: Vec<RawEntity>,
    },
    /// Fresh info for one entity, with its (possibly empty) children
    UpsertEntity {
        entity: RawEntity,
        children: Vec<RawEntity>,
    },
    /// Entity is gone from the given placement
    RemoveEntity {
        placement: Placement,
        entity_id: EntityId,
    },
    Expand {
        entity_id: EntityId,
    },
    Collapse {
        entity_id: EntityId,
    },
    Select {
        entity_id: EntityId,
    },
    Deselect {
        entity_id: EntityId,
    },
    DeselectAll,
    SetSelectedDetails {
        details: Option<Value>,
    },
    SetActionType {
        action_type: Option<String>,
    },
    SetActionDetail {
        detail: Option<Value>,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitiesState {
    pub roots: Vec<EntityId>,
    pub inventory: Vec<EntityId>,
    pub children: HashMap<EntityId, Vec<EntityId>>,
    pub info: HashMap<EntityId, EntityInfo>,
    pub expanded: HashSet<EntityId>,
    pub selected: BTreeSet<EntityId>,
    pub selected_details: Option<Value>,
    pub action_type: Option<String>,
    pub action_detail: Option<Value>,
}

impl EntitiesState {
    pub fn info(&self, entity_id: &EntityId) -> Option<&EntityInfo> {
        self.info.get(entity_id)
    }

    pub fn children_of(&self, entity_id: &EntityId) -> &[EntityId] {
        self.children.get(entity_id).map_or(&[], Vec::as_slice)
    }

    pub fn is_expanded(&self, entity_id: &EntityId) -> bool {
        self.expanded.contains(entity_id)
    }

    pub fn is_selected(&self, entity_id: &EntityId) -> bool {
        self.selected.contains(entity_id)
    }

    /// Find where an entity is currently shown.
    ///
    /// Inventory wins over the adjacency map, which wins over the root list.
    pub fn locate(&self, entity_id: &EntityId) -> Option<Placement> {
        if self.inventory.contains(entity_id) {
            return Some(Placement::Inventory);
        }
        if let Some(parent) = self
            .children
            .iter()
            .find_map(|(parent, kids)| kids.contains(entity_id).then_some(parent))
        {
            return Some(Placement::Under(parent.clone()));
        }
        if self.roots.contains(entity_id) {
            return Some(Placement::Root);
        }
        None
    }

    /// Entity that has to be refreshed for `entity_id`.
    ///
    /// Activities are refreshed through the item that owns them.
    pub fn refresh_target(&self, entity_id: &EntityId) -> EntityId {
        match self.info.get(entity_id) {
            Some(info) if info.is_activity() => info
                .owner
                .clone()
                .or_else(|| self.activity_owner(entity_id))
                .unwrap_or_else(|| entity_id.clone()),
            _ => entity_id.clone(),
        }
    }

    fn activity_owner(&self, activity_id: &EntityId) -> Option<EntityId> {
        self.info.values().find_map(|row| {
            row.activities
                .as_ref()
                .filter(|ids| ids.contains(activity_id))
                .map(|_| row.id.clone())
        })
    }

    fn apply(&mut self, action: &EntitiesAction) {
        match action {
            EntitiesAction::ReplaceRoots { entities } => {
                let (ids, rows) = flatten_all(entities.clone());
                self.upsert_rows(rows);
                self.place(Placement::Root, ids);
            }
            EntitiesAction::ReplaceInventory { entities } => {
                let (ids, rows) = flatten_all(entities.clone());
                self.upsert_rows(rows);
                self.place(Placement::Inventory, ids);
            }
            EntitiesAction::ReplaceChildren {
                parent_id,
                entities,
            } => {
                let (ids, rows) = flatten_all(entities.clone());
                self.upsert_rows(rows);
                self.place(Placement::Under(parent_id.clone()), ids);
            }
            EntitiesAction::UpsertEntity { entity, children } => {
                let entity_id = entity.id.clone();
                self.upsert_rows(flatten(entity.clone()));
                let (ids, rows) = flatten_all(children.clone());
                self.upsert_rows(rows);
                self.place(Placement::Under(entity_id), ids);
            }
            EntitiesAction::RemoveEntity {
                placement,
                entity_id,
            } => {
                if let Some(list) = self.container_mut(placement) {
                    list.retain(|id| id != entity_id);
                }
            }
            EntitiesAction::Expand { entity_id } => {
                self.expanded.insert(entity_id.clone());
            }
            EntitiesAction::Collapse { entity_id } => {
                self.expanded.remove(entity_id);
            }
            EntitiesAction::Select { entity_id } => {
                self.selected.insert(entity_id.clone());
                self.clear_action_workflow();
            }
            EntitiesAction::Deselect { entity_id } => {
                self.selected.remove(entity_id);
                self.clear_action_workflow();
            }
            EntitiesAction::DeselectAll => {
                self.selected.clear();
                self.selected_details = None;
                self.clear_action_workflow();
            }
            EntitiesAction::SetSelectedDetails { details } => {
                self.selected_details = details.clone();
            }
            EntitiesAction::SetActionType { action_type } => {
                self.action_type = action_type.clone();
                self.action_detail = None;
            }
            EntitiesAction::SetActionDetail { detail } => {
                self.action_detail = detail.clone();
            }
        }
    }

    /// Overwrite rows wholesale.
    ///
    /// An item's previous activity rows go with it; the new response decides
    /// which activities exist.
    fn upsert_rows(&mut self, rows: Vec<EntityInfo>) {
        for row in rows {
            if let Some(previous) = self.info.remove(&row.id) {
                for activity_id in previous.activities.into_iter().flatten() {
                    self.info.remove(&activity_id);
                }
            }
            self.info.insert(row.id.clone(), row);
        }
    }

    /// Set a container's list, detaching the same ids from every other container
    fn place(&mut self, placement: Placement, ids: Vec<EntityId>) {
        let moved: HashSet<&EntityId> = ids.iter().collect();

        if placement != Placement::Root {
            self.roots.retain(|id| !moved.contains(id));
        }
        if placement != Placement::Inventory {
            self.inventory.retain(|id| !moved.contains(id));
        }
        for (parent, kids) in self.children.iter_mut() {
            if !matches!(&placement, Placement::Under(p) if p == parent) {
                kids.retain(|id| !moved.contains(id));
            }
        }

        match placement {
            Placement::Root => self.roots = ids,
            Placement::Inventory => self.inventory = ids,
            Placement::Under(parent) => {
                self.children.insert(parent, ids);
            }
        }
    }

    fn container_mut(&mut self, placement: &Placement) -> Option<&mut Vec<EntityId>> {
        match placement {
            Placement::Root => Some(&mut self.roots),
            Placement::Inventory => Some(&mut self.inventory),
            Placement::Under(parent) => self.children.get_mut(parent),
        }
    }

    fn clear_action_workflow(&mut self) {
        self.action_type = None;
        self.action_detail = None;
    }
}

/// Reducer for [`EntitiesState`]; meant to be wrapped in `CharacterScoped`
#[derive(Debug, Clone, Copy, Default)]
pub struct EntitiesReducer;

impl Reducer for EntitiesReducer {
    type State = EntitiesState;
    type Action = Action;

    fn reduce(&self, state: &Arc<EntitiesState>, action: &Action) -> Arc<EntitiesState> {
        let Action::Entities { action, .. } = action else {
            return Arc::clone(state);
        };
        let mut next = EntitiesState::clone(state);
        next.apply(action);
        Arc::new(next)
    }
}
