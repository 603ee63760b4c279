//! Per-character feed of server-rendered events

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::markup::Fragment;

use super::keyed::Reducer;
use super::Action;

/// Oldest entries are dropped beyond this many per character
pub const FEED_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub fragments: Vec<Fragment>,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventFeedAction {
    Append(FeedEntry),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFeed {
    /// Oldest first, at most [`FEED_CAPACITY`]
    pub entries: VecDeque<FeedEntry>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EventFeedReducer;

impl Reducer for EventFeedReducer {
    type State = EventFeed;
    type Action = Action;

    fn reduce(&self, state: &Arc<EventFeed>, action: &Action) -> Arc<EventFeed> {
        match action {
            Action::EventFeed {
                action: EventFeedAction::Append(entry),
                ..
            } => {
                let mut next = EventFeed::clone(state);
                if next.entries.len() == FEED_CAPACITY {
                    next.entries.pop_front();
                }
                next.entries.push_back(entry.clone());
                Arc::new(next)
            }
            _ => Arc::clone(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exeris_domain::CharacterId;

    fn append(state: &Arc<EventFeed>, line: usize) -> Arc<EventFeed> {
        let action = Action::event_feed(
            &CharacterId::from(1u64),
            EventFeedAction::Append(FeedEntry {
                fragments: vec![Fragment::Text(format!("line {line}"))],
                received_at: Utc::now(),
            }),
        );
        EventFeedReducer.reduce(state, &action)
    }

    #[test]
    fn feed_keeps_only_the_newest_entries() {
        let mut feed = Arc::new(EventFeed::default());
        for line in 0..FEED_CAPACITY + 5 {
            feed = append(&feed, line);
        }

        assert_eq!(feed.entries.len(), FEED_CAPACITY);
        assert_eq!(
            feed.entries.front().map(|entry| entry.fragments.clone()),
            Some(vec![Fragment::Text("line 5".into())])
        );
        assert_eq!(
            feed.entries.back().map(|entry| entry.fragments.clone()),
            Some(vec![Fragment::Text(format!("line {}", FEED_CAPACITY + 4))])
        );
    }

    #[test]
    fn other_actions_keep_the_same_feed() {
        let feed = append(&Arc::new(EventFeed::default()), 0);
        let action = Action::Notifications(crate::state::NotificationsAction::Dismiss { id: 0 });

        assert!(Arc::ptr_eq(&feed, &EventFeedReducer.reduce(&feed, &action)));
    }
}
