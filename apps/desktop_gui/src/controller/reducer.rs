//! Pure state transitions for UI events coming back from the backend worker.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use client_core::{RosterEntry, SessionSnapshot};
use shared::domain::Character;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortraitState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub roster: Vec<RosterEntry>,
    pub selected: Option<Character>,
    pub vote_input: String,
    pub new_name: String,
    pub new_image: String,
    /// Blocking message shown until dismissed.
    pub alert: Option<String>,
    pub status: String,
    pub last_synced: Option<DateTime<Local>>,
    pub portraits: HashMap<String, PortraitState>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            status: "Loading characters...".to_string(),
            ..Self::default()
        }
    }

    /// Applies one backend event and returns follow-up commands to queue.
    pub fn apply(&mut self, event: UiEvent, now: DateTime<Local>) -> Vec<BackendCommand> {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
                Vec::new()
            }
            UiEvent::Synced(snapshot) => {
                self.replace(snapshot, now);
                self.status = match self.roster.len() {
                    0 => "No characters yet".to_string(),
                    1 => "Loaded 1 character".to_string(),
                    n => format!("Loaded {n} characters"),
                };
                self.portrait_request().into_iter().collect()
            }
            UiEvent::VotesUpdated { snapshot, change } => {
                self.replace(snapshot, now);
                self.vote_input.clear();
                self.status = format!("Votes: {} -> {}", change.previous, change.votes);
                Vec::new()
            }
            UiEvent::Rejected(message) => {
                self.alert = Some(message);
                Vec::new()
            }
            UiEvent::CharacterCreated(snapshot) => {
                self.replace(snapshot, now);
                self.new_name.clear();
                self.new_image.clear();
                if let Some(selected) = &self.selected {
                    self.status = format!("Added {}", selected.name);
                }
                self.portrait_request().into_iter().collect()
            }
            UiEvent::PortraitLoaded { url, .. } => {
                self.portraits.insert(url, PortraitState::Ready);
                Vec::new()
            }
            UiEvent::PortraitFailed { url, reason } => {
                self.portraits.insert(url, PortraitState::Failed(reason));
                Vec::new()
            }
            UiEvent::Error(err) => {
                self.status = err.status_text();
                Vec::new()
            }
        }
    }

    /// True while an alert is open; every panel ignores input until then.
    pub fn is_blocked(&self) -> bool {
        self.alert.is_some()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn is_selected(&self, entry: &RosterEntry) -> bool {
        self.selected.as_ref().map(|c| &c.id) == Some(&entry.id)
    }

    fn replace(&mut self, snapshot: SessionSnapshot, now: DateTime<Local>) {
        let selection_changed =
            self.selected.as_ref().map(|c| &c.id) != snapshot.selected.as_ref().map(|c| &c.id);
        if selection_changed {
            self.vote_input.clear();
        }
        self.roster = snapshot.roster;
        self.selected = snapshot.selected;
        self.last_synced = Some(now);
    }

    fn portrait_request(&mut self) -> Option<BackendCommand> {
        let url = self.selected.as_ref()?.image.clone();
        if url.is_empty() || self.portraits.contains_key(&url) {
            return None;
        }
        self.portraits.insert(url.clone(), PortraitState::Loading);
        Some(BackendCommand::FetchPortrait { url })
    }
}
