//! Notification service - dismissible messages from the server

use std::sync::Arc;

use crate::state::{Action, NotificationsAction, Store};

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<Store>,
}

impl NotificationService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn show_error(&self, message: impl Into<String>) {
        self.store
            .dispatch(Action::Notifications(NotificationsAction::Push {
                message: message.into(),
            }));
    }

    pub fn dismiss(&self, id: u64) {
        self.store
            .dispatch(Action::Notifications(NotificationsAction::Dismiss { id }));
    }
}
