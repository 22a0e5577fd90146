use thiserror::Error;

/// Rejections raised while reading the vote input field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoteInputError {
    #[error("'{0}' is not a whole number of votes")]
    NotANumber(String),
    #[error("vote count cannot be negative (got {0})")]
    Negative(i64),
    #[error("adding {delta} votes to {current} would overflow the counter")]
    Overflow { current: u64, delta: u64 },
}

impl VoteInputError {
    /// Text shown in the blocking alert.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotANumber(_) | Self::Negative(_) => "Please enter a valid number of votes.",
            Self::Overflow { .. } => "That many votes cannot be counted.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterFormError {
    #[error("character name is required")]
    MissingName,
    #[error("character image url is required")]
    MissingImage,
}
