//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{SessionError, SessionSnapshot, StoreError, VoteChange};

use crate::media::PreviewImage;

pub enum UiEvent {
    Info(String),
    /// Roster and selection replaced after a refresh or a selection.
    Synced(SessionSnapshot),
    VotesUpdated {
        snapshot: SessionSnapshot,
        change: VoteChange,
    },
    Rejected(String),
    CharacterCreated(SessionSnapshot),
    PortraitLoaded {
        url: String,
        image: PreviewImage,
    },
    PortraitFailed {
        url: String,
        reason: String,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Decode,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadRoster,
    UpdateVotes,
    CreateCharacter,
    Portrait,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("required")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("malformed")
            || message_lower.contains("decode")
            || message_lower.contains("unsupported image")
        {
            UiErrorCategory::Decode
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("request to")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_session_error(context: UiErrorContext, err: &SessionError) -> Self {
        let category = match err {
            SessionError::InvalidVotes(_)
            | SessionError::InvalidForm(_)
            | SessionError::NoSelection
            | SessionError::UnknownCharacter(_) => UiErrorCategory::Validation,
            SessionError::Store(StoreError::Decode { .. }) => UiErrorCategory::Decode,
            SessionError::Store(StoreError::Transport { .. } | StoreError::Status { .. }) => {
                UiErrorCategory::Transport
            }
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status-line text for this error.
    pub fn status_text(&self) -> String {
        let action = match self.context {
            UiErrorContext::BackendStartup => "Starting backend",
            UiErrorContext::LoadRoster => "Loading characters",
            UiErrorContext::UpdateVotes => "Saving votes",
            UiErrorContext::CreateCharacter => "Adding character",
            UiErrorContext::Portrait => "Loading portrait",
            UiErrorContext::General => "Request",
        };
        let label = match self.category {
            UiErrorCategory::Transport => "server unreachable or refused the request",
            UiErrorCategory::Validation => "invalid input",
            UiErrorCategory::Decode => "unexpected server response",
            UiErrorCategory::Unknown => "error",
        };
        format!("{action} failed ({label}): {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use shared::error::VoteInputError;

    use super::*;

    #[test]
    fn classifies_command_queue_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn vote_rejections_are_validation_errors() {
        let err = UiError::from_session_error(
            UiErrorContext::UpdateVotes,
            &SessionError::InvalidVotes(VoteInputError::NotANumber("abc".into())),
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::UpdateVotes);
        assert!(err.status_text().starts_with("Saving votes failed (invalid input)"));
    }

    #[test]
    fn decode_failures_are_classified_from_message() {
        let err = UiError::from_message(
            UiErrorContext::Portrait,
            "unsupported image format for https://example.test/x.svg",
        );
        assert_eq!(err.category(), UiErrorCategory::Decode);
    }
}
