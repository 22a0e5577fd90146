//! Backend commands queued from UI to backend worker.

use shared::domain::CharacterId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Refresh,
    Select { id: CharacterId },
    AddVotes { raw_input: String },
    ResetVotes,
    CreateCharacter { name: String, image: String },
    FetchPortrait { url: String },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Select { .. } => "select",
            Self::AddVotes { .. } => "add_votes",
            Self::ResetVotes => "reset_votes",
            Self::CreateCharacter { .. } => "create_character",
            Self::FetchPortrait { .. } => "fetch_portrait",
        }
    }
}
