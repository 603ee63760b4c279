//! Characters owned by the logged-in player

use std::sync::Arc;

use exeris_protocol::CharacterSummary;

use super::Action;

#[derive(Debug, Clone, PartialEq)]
pub enum CharactersAction {
    Replace { characters: Vec<CharacterSummary> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharactersState {
    pub list: Vec<CharacterSummary>,
}

pub fn reduce(state: &Arc<CharactersState>, action: &Action) -> Arc<CharactersState> {
    match action {
        Action::Characters(CharactersAction::Replace { characters }) => Arc::new(CharactersState {
            list: characters.clone(),
        }),
        _ => Arc::clone(state),
    }
}
