//! Per-character partitioning of reducer state.
//!
//! A reducer written for a single character is lifted into one that keeps an
//! independent slice per character id. Actions without a character id are not
//! addressed to any partitioned reducer and leave the whole map untouched,
//! down to the `Arc` it lives in.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use exeris_domain::CharacterId;

/// A pure state transition.
///
/// Returning `Arc::clone(state)` signals "no change"; callers rely on pointer
/// identity for that.
pub trait Reducer {
    type State: Default;
    type Action;

    fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State>;
}

/// Actions that may be addressed to one character's state
pub trait SessionScoped {
    fn session_key(&self) -> Option<&CharacterId>;
}

/// One slice of `S` per character id
pub struct Keyed<S> {
    slices: HashMap<CharacterId, Arc<S>>,
}

impl<S> Keyed<S> {
    pub fn get(&self, key: &CharacterId) -> Option<&Arc<S>> {
        self.slices.get(key)
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &CharacterId> {
        self.slices.keys()
    }
}

impl<S: Default> Keyed<S> {
    /// Slice for `key`, or a fresh default one if the key has never been seen
    pub fn slice(&self, key: &CharacterId) -> Arc<S> {
        self.slices.get(key).cloned().unwrap_or_default()
    }
}

impl<S> Default for Keyed<S> {
    fn default() -> Self {
        Self {
            slices: HashMap::new(),
        }
    }
}

impl<S> Clone for Keyed<S> {
    fn clone(&self) -> Self {
        Self {
            slices: self.slices.clone(),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Keyed<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.slices.iter()).finish()
    }
}

/// Lifts a single-character reducer into a [`Keyed`] one
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterScoped<R>(pub R);

impl<R> Reducer for CharacterScoped<R>
where
    R: Reducer,
    R::Action: SessionScoped,
{
    type State = Keyed<R::State>;
    type Action = R::Action;

    fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State> {
        let Some(key) = action.session_key() else {
            return Arc::clone(state);
        };

        let current = state.slices.get(key);
        let base = current.cloned().unwrap_or_default();
        let next = self.0.reduce(&base, action);

        if current.is_some_and(|current| Arc::ptr_eq(current, &next)) {
            return Arc::clone(state);
        }

        let mut slices = state.slices.clone();
        slices.insert(key.clone(), next);
        Arc::new(Keyed { slices })
    }
}
