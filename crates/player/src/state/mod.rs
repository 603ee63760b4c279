//! Client state.
//!
//! One root state, changed only by dispatching [`Action`]s through the
//! [`Store`]. Character-scoped slices are partitioned with
//! [`keyed::CharacterScoped`]; everything else is global.

pub mod characters;
pub mod dynamic_names;
pub mod entities;
pub mod event_feed;
pub mod keyed;
pub mod normalize;
pub mod notifications;
mod store;
pub mod top_panel;

use std::sync::Arc;

use exeris_domain::CharacterId;

pub use characters::{CharactersAction, CharactersState};
pub use dynamic_names::{DynamicNameAction, DynamicNameCache};
pub use entities::{EntitiesAction, EntitiesState, Placement};
pub use event_feed::{EventFeed, EventFeedAction, FeedEntry};
pub use keyed::{CharacterScoped, Keyed, Reducer, SessionScoped};
pub use notifications::{Notification, NotificationsAction, NotificationsState};
pub use store::Store;
pub use top_panel::{TopPanel, TopPanelAction, TopPanelState};

use dynamic_names::DynamicNameReducer;
use entities::EntitiesReducer;
use event_feed::EventFeedReducer;
use top_panel::TopPanelReducer;

/// Everything that can change client state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Entities {
        character_id: CharacterId,
        action: EntitiesAction,
    },
    TopPanel {
        character_id: CharacterId,
        action: TopPanelAction,
    },
    DynamicNames {
        character_id: CharacterId,
        action: DynamicNameAction,
    },
    EventFeed {
        character_id: CharacterId,
        action: EventFeedAction,
    },
    Characters(CharactersAction),
    Notifications(NotificationsAction),
}

impl Action {
    pub fn entities(character_id: &CharacterId, action: EntitiesAction) -> Self {
        Action::Entities {
            character_id: character_id.clone(),
            action,
        }
    }

    pub fn top_panel(character_id: &CharacterId, action: TopPanelAction) -> Self {
        Action::TopPanel {
            character_id: character_id.clone(),
            action,
        }
    }

    pub fn dynamic_names(character_id: &CharacterId, action: DynamicNameAction) -> Self {
        Action::DynamicNames {
            character_id: character_id.clone(),
            action,
        }
    }

    pub fn event_feed(character_id: &CharacterId, action: EventFeedAction) -> Self {
        Action::EventFeed {
            character_id: character_id.clone(),
            action,
        }
    }
}

impl SessionScoped for Action {
    fn session_key(&self) -> Option<&CharacterId> {
        match self {
            Action::Entities { character_id, .. }
            | Action::TopPanel { character_id, .. }
            | Action::DynamicNames { character_id, .. }
            | Action::EventFeed { character_id, .. } => Some(character_id),
            Action::Characters(_) | Action::Notifications(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RootState {
    pub entities: Arc<Keyed<EntitiesState>>,
    pub top_panel: Arc<Keyed<TopPanelState>>,
    pub dynamic_names: Arc<Keyed<DynamicNameCache>>,
    pub event_feed: Arc<Keyed<EventFeed>>,
    pub characters: Arc<CharactersState>,
    pub notifications: Arc<NotificationsState>,
}

impl RootState {
    pub fn entities_of(&self, character_id: &CharacterId) -> Arc<EntitiesState> {
        self.entities.slice(character_id)
    }

    pub fn top_panel_of(&self, character_id: &CharacterId) -> Arc<TopPanelState> {
        self.top_panel.slice(character_id)
    }

    pub fn dynamic_names_of(&self, character_id: &CharacterId) -> Arc<DynamicNameCache> {
        self.dynamic_names.slice(character_id)
    }

    pub fn event_feed_of(&self, character_id: &CharacterId) -> Arc<EventFeed> {
        self.event_feed.slice(character_id)
    }
}

/// Apply one action to the whole tree
pub fn reduce_root(state: &RootState, action: &Action) -> RootState {
    RootState {
        entities: CharacterScoped(EntitiesReducer).reduce(&state.entities, action),
        top_panel: CharacterScoped(TopPanelReducer).reduce(&state.top_panel, action),
        dynamic_names: CharacterScoped(DynamicNameReducer).reduce(&state.dynamic_names, action),
        event_feed: CharacterScoped(EventFeedReducer).reduce(&state.event_feed, action),
        characters: characters::reduce(&state.characters, action),
        notifications: notifications::reduce(&state.notifications, action),
    }
}
