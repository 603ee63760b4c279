//! Event feed service - turns pushed event markup into feed entries

use std::sync::Arc;

use chrono::Utc;

use exeris_domain::CharacterId;

use crate::markup::parse_dynamic_names;
use crate::state::{Action, EventFeedAction, FeedEntry, Store};

#[derive(Clone)]
pub struct EventFeedService {
    store: Arc<Store>,
}

impl EventFeedService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Parse one event for `character_id` and append it to the feed
    ///
    /// Names embedded in the markup land in the dynamic-name cache before
    /// the entry is appended.
    pub fn receive(&self, character_id: &CharacterId, html: &str) {
        let parsed = parse_dynamic_names(html, character_id);
        for update in parsed.cache_updates {
            self.store.dispatch(update);
        }
        self.store.dispatch(Action::event_feed(
            character_id,
            EventFeedAction::Append(FeedEntry {
                fragments: parsed.fragments,
                received_at: Utc::now(),
            }),
        ));
    }
}
