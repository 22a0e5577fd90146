use serde::{Deserialize, Serialize};

use crate::domain::CharacterId;

pub const DEFAULT_COLLECTION_URL: &str = "http://localhost:3000/characters";

/// Body of `PATCH {collection}/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotesPatch {
    pub votes: u64,
}

pub fn collection_route(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

pub fn character_route(base_url: &str, id: &CharacterId) -> String {
    format!("{}/{id}", base_url.trim_end_matches('/'))
}
