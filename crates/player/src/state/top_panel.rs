//! Top panel: which auxiliary detail view is open, and for whom.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use exeris_domain::EntityId;

use super::keyed::Reducer;
use super::Action;

/// Open detail view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TopPanel {
    #[default]
    Closed,
    Character(EntityId),
    Combat(EntityId),
}

impl TopPanel {
    pub fn target(&self) -> Option<&EntityId> {
        match self {
            TopPanel::Closed => None,
            TopPanel::Character(target) | TopPanel::Combat(target) => Some(target),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopPanelAction {
    ApplyCharacterDetails {
        target_id: EntityId,
        details: Value,
    },
    ApplyCombatDetails {
        target_id: EntityId,
        details: Value,
    },
    Close,
    SetModifier {
        key: String,
        value: Value,
    },
    RemoveModifier {
        key: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopPanelState {
    pub panel: TopPanel,
    /// Last fetched details for the open panel
    pub details: Option<Value>,
    /// View options layered on the open panel; wiped when the panel changes
    pub modifiers: BTreeMap<String, Value>,
}

impl TopPanelState {
    fn apply(&self, action: &TopPanelAction) -> Self {
        match action {
            TopPanelAction::ApplyCharacterDetails { target_id, details } => Self {
                panel: TopPanel::Character(target_id.clone()),
                details: Some(details.clone()),
                modifiers: BTreeMap::new(),
            },
            TopPanelAction::ApplyCombatDetails { target_id, details } => Self {
                panel: TopPanel::Combat(target_id.clone()),
                details: Some(details.clone()),
                modifiers: BTreeMap::new(),
            },
            TopPanelAction::Close => Self::default(),
            TopPanelAction::SetModifier { key, value } => {
                let mut next = self.clone();
                next.modifiers.insert(key.clone(), value.clone());
                next
            }
            TopPanelAction::RemoveModifier { key } => {
                let mut next = self.clone();
                next.modifiers.remove(key);
                next
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TopPanelReducer;

impl Reducer for TopPanelReducer {
    type State = TopPanelState;
    type Action = Action;

    fn reduce(&self, state: &Arc<TopPanelState>, action: &Action) -> Arc<TopPanelState> {
        match action {
            Action::TopPanel { action, .. } => Arc::new(state.apply(action)),
            _ => Arc::clone(state),
        }
    }
}
