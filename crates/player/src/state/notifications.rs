//! Dismissible error notifications pushed by the server.
//!
//! Notifications are not tied to the request that caused them.

use std::sync::Arc;

use super::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationsAction {
    Push { message: String },
    Dismiss { id: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationsState {
    next_id: u64,
    pub items: Vec<Notification>,
}

pub fn reduce(state: &Arc<NotificationsState>, action: &Action) -> Arc<NotificationsState> {
    let Action::Notifications(action) = action else {
        return Arc::clone(state);
    };

    let mut next = NotificationsState::clone(state);
    match action {
        NotificationsAction::Push { message } => {
            next.items.push(Notification {
                id: next.next_id,
                message: message.clone(),
            });
            next.next_id += 1;
        }
        NotificationsAction::Dismiss { id } => {
            if !next.items.iter().any(|n| n.id == *id) {
                return Arc::clone(state);
            }
            next.items.retain(|n| n.id != *id);
        }
    }
    Arc::new(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(state: &Arc<NotificationsState>, message: &str) -> Arc<NotificationsState> {
        reduce(
            state,
            &Action::Notifications(NotificationsAction::Push {
                message: message.into(),
            }),
        )
    }

    #[test]
    fn ids_keep_increasing_after_dismissal() {
        let state = push(&Arc::default(), "You are too tired");
        let state = reduce(
            &state,
            &Action::Notifications(NotificationsAction::Dismiss { id: 0 }),
        );
        let state = push(&state, "Not enough space");

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, 1);
    }

    #[test]
    fn dismissing_unknown_id_is_a_no_op() {
        let state = push(&Arc::default(), "x");
        let next = reduce(
            &state,
            &Action::Notifications(NotificationsAction::Dismiss { id: 42 }),
        );
        assert!(Arc::ptr_eq(&state, &next));
    }
}
