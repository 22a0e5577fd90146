//! Roster and selection state kept in sync with the remote collection.
//!
//! [`CharacterSession`] is the only owner of the selected character. Front-ends
//! drive it through `refresh`, `select`, `add_votes`, `reset_votes` and
//! `create_character`, and render from [`CharacterSession::snapshot`].

use serde::Serialize;
use shared::{
    domain::{parse_vote_delta, Character, CharacterId, NewCharacter},
    error::{CharacterFormError, VoteInputError},
};
use thiserror::Error;
use tracing::{info, warn};

use crate::store::{RemoteStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidVotes(#[from] VoteInputError),
    #[error(transparent)]
    InvalidForm(#[from] CharacterFormError),
    #[error("no character is selected")]
    NoSelection,
    #[error("character {0} is not in the roster")]
    UnknownCharacter(CharacterId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// True when the request was refused before anything changed.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InvalidVotes(_) | Self::InvalidForm(_))
    }
}

/// Display copy of a roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub id: CharacterId,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub roster: Vec<RosterEntry>,
    pub selected: Option<Character>,
}

/// Outcome of an accepted vote change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteChange {
    pub previous: u64,
    pub votes: u64,
}

pub struct CharacterSession<S: RemoteStore> {
    store: S,
    roster: Vec<Character>,
    selected: Option<Character>,
}

impl<S: RemoteStore> CharacterSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            roster: Vec::new(),
            selected: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn selected(&self) -> Option<&Character> {
        self.selected.as_ref()
    }

    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            roster: self
                .roster
                .iter()
                .map(|character| RosterEntry {
                    id: character.id.clone(),
                    name: character.name.clone(),
                })
                .collect(),
            selected: self.selected.clone(),
        }
    }

    /// Replaces the roster with the remote collection and selects its first
    /// entry. On failure the current roster is kept.
    pub async fn refresh(&mut self) -> Result<usize, SessionError> {
        let characters = self.store.list().await?;
        self.roster = characters;
        self.selected = self.roster.first().cloned();
        info!(count = self.roster.len(), "session: roster refreshed");
        Ok(self.roster.len())
    }

    pub fn select(&mut self, id: &CharacterId) -> Result<&Character, SessionError> {
        let character = self
            .roster
            .iter()
            .find(|character| &character.id == id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownCharacter(id.clone()))?;
        Ok(self.selected.insert(character))
    }

    /// Adds the votes typed into the vote field to the selected character.
    ///
    /// The local count is updated before the remote write and is not rolled
    /// back if that write fails; the failure is returned as
    /// [`SessionError::Store`].
    pub async fn add_votes(&mut self, raw_input: &str) -> Result<VoteChange, SessionError> {
        let selected = self.selected.as_ref().ok_or(SessionError::NoSelection)?;
        let delta = parse_vote_delta(raw_input)?;
        let votes = selected.with_added_votes(delta)?;
        self.apply_votes(votes).await
    }

    pub async fn reset_votes(&mut self) -> Result<VoteChange, SessionError> {
        if self.selected.is_none() {
            return Err(SessionError::NoSelection);
        }
        self.apply_votes(0).await
    }

    async fn apply_votes(&mut self, votes: u64) -> Result<VoteChange, SessionError> {
        let selected = self.selected.as_mut().ok_or(SessionError::NoSelection)?;
        let previous = selected.votes;
        selected.votes = votes;
        let id = selected.id.clone();

        if let Some(entry) = self.roster.iter_mut().find(|entry| entry.id == id) {
            entry.votes = votes;
        }

        if let Err(err) = self.store.patch_votes(&id, votes).await {
            warn!(character_id = %id, votes, "session: remote vote count is out of sync");
            return Err(err.into());
        }
        Ok(VoteChange { previous, votes })
    }

    /// Creates a character remotely, then appends and selects it.
    pub async fn create_character(
        &mut self,
        name: &str,
        image: &str,
    ) -> Result<&Character, SessionError> {
        let draft = NewCharacter::new(name, image)?;
        let created = self.store.create(&draft).await?;
        info!(character_id = %created.id, "session: character added to roster");
        self.roster.push(created.clone());
        Ok(self.selected.insert(created))
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
