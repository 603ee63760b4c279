use std::sync::{Arc, PoisonError, RwLock};

use super::{reduce_root, Action, RootState};

type Listener = Arc<dyn Fn(&Action) + Send + Sync + 'static>;

/// Single owner of client state.
///
/// `dispatch` applies the root reducer synchronously, so actions take effect
/// strictly in dispatch order. Subscribers see every action after it has been
/// applied.
#[derive(Default)]
pub struct Store {
    state: RwLock<Arc<RootState>>,
    listeners: RwLock<Vec<Listener>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> Arc<RootState> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*state)
    }

    pub fn dispatch(&self, action: Action) {
        {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = reduce_root(&**state, &action);
            *state = Arc::new(next);
        }

        tracing::trace!(?action, "dispatched");

        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(&action);
        }
    }

    /// Register a listener invoked after every dispatch
    pub fn subscribe(&self, listener: impl Fn(&Action) + Send + Sync + 'static) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NotificationsAction;
    use std::sync::Mutex;

    #[test]
    fn subscribers_see_actions_in_dispatch_order() {
        let store = Store::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |action| sink.lock().unwrap().push(action.clone()));

        store.dispatch(Action::Notifications(NotificationsAction::Push {
            message: "a".into(),
        }));
        store.dispatch(Action::Notifications(NotificationsAction::Dismiss { id: 0 }));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(matches!(
            seen[1],
            Action::Notifications(NotificationsAction::Dismiss { id: 0 })
        ));
        assert!(store.state().notifications.items.is_empty());
    }
}
