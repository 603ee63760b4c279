//! Character Service - the player's character list

use std::sync::Arc;

use exeris_protocol::{CharacterSummary, GameRequest};

use crate::application::{ParseAck, ServiceError};
use crate::ports::outbound::GameRequestPort;
use crate::state::{Action, CharactersAction, Store};

#[derive(Clone)]
pub struct CharacterService {
    store: Arc<Store>,
    requests: Arc<dyn GameRequestPort>,
}

impl CharacterService {
    pub fn new(store: Arc<Store>, requests: Arc<dyn GameRequestPort>) -> Self {
        Self { store, requests }
    }

    /// Replace the stored list with the server's
    pub async fn fetch_characters_list(&self) -> Result<(), ServiceError> {
        let characters: Vec<CharacterSummary> = self
            .requests
            .request(GameRequest::GetCharactersList)
            .await?
            .parse()?;
        tracing::debug!(count = characters.len(), "Loaded characters list");
        self.store
            .dispatch(Action::Characters(CharactersAction::Replace { characters }));
        Ok(())
    }
}
