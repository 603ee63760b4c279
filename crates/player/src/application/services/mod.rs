//! Application services
//!
//! Each service is an action creator: it reads the store, issues calls
//! through [`GameRequestPort`](crate::ports::outbound::GameRequestPort) and
//! dispatches plain actions once the acknowledgement arrives. A failed call
//! dispatches nothing; there are no retries and no timeouts.

pub mod character_service;
pub mod entity_service;
pub mod event_feed_service;
pub mod naming_service;
pub mod notification_service;
pub mod top_panel_service;

use std::sync::Arc;

use crate::ports::outbound::GameRequestPort;
use crate::state::Store;

pub use character_service::CharacterService;
pub use entity_service::EntityService;
pub use event_feed_service::EventFeedService;
pub use naming_service::NamingService;
pub use notification_service::NotificationService;
pub use top_panel_service::TopPanelService;

/// All services, wired to one store and one request port
#[derive(Clone)]
pub struct Services {
    pub characters: CharacterService,
    pub entities: EntityService,
    pub event_feed: EventFeedService,
    pub naming: NamingService,
    pub notifications: NotificationService,
    pub top_panel: TopPanelService,
}

impl Services {
    pub fn new(store: Arc<Store>, requests: Arc<dyn GameRequestPort>) -> Self {
        let top_panel = TopPanelService::new(Arc::clone(&store), Arc::clone(&requests));
        Self {
            characters: CharacterService::new(Arc::clone(&store), Arc::clone(&requests)),
            entities: EntityService::new(Arc::clone(&store), Arc::clone(&requests)),
            event_feed: EventFeedService::new(Arc::clone(&store)),
            naming: NamingService::new(Arc::clone(&store), requests, top_panel.clone()),
            notifications: NotificationService::new(store),
            top_panel,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, Mutex};

    use crate::state::{Action, Store};

    /// Store plus a log of every action dispatched into it
    pub fn recording_store() -> (Arc<Store>, Arc<Mutex<Vec<Action>>>) {
        let store = Arc::new(Store::new());
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        store.subscribe(move |action| sink.lock().unwrap().push(action.clone()));
        (store, log)
    }
}
