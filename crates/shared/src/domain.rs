use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CharacterFormError, VoteInputError};

/// Identifier assigned by the remote collection.
///
/// Stores hand out either auto-increment integers or string ids, so both are
/// accepted and rendered back verbatim into resource paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacterId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for CharacterId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for CharacterId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(id) => Self::Numeric(id),
            Err(_) => Self::Text(value.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub votes: u64,
}

impl Character {
    /// Adds `delta` to the vote counter, refusing to wrap.
    pub fn with_added_votes(&self, delta: u64) -> Result<u64, VoteInputError> {
        self.votes
            .checked_add(delta)
            .ok_or(VoteInputError::Overflow {
                current: self.votes,
                delta,
            })
    }
}

/// A character that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCharacter {
    pub name: String,
    pub image: String,
    pub votes: u64,
}

impl NewCharacter {
    pub fn new(name: &str, image: &str) -> Result<Self, CharacterFormError> {
        let name = name.trim();
        let image = image.trim();
        if name.is_empty() {
            return Err(CharacterFormError::MissingName);
        }
        if image.is_empty() {
            return Err(CharacterFormError::MissingImage);
        }
        Ok(Self {
            name: name.to_string(),
            image: image.to_string(),
            votes: 0,
        })
    }
}

/// Parses the raw text of the vote input.
///
/// Empty input counts as zero votes. Like a browser's `parseInt`, only the
/// leading sign and digits are read, so `"1.5"` is 1 and `"3abc"` is 3. Input
/// with no leading digit is rejected.
pub fn parse_vote_delta(raw: &str) -> Result<u64, VoteInputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let (negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = unsigned
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return Err(VoteInputError::NotANumber(trimmed.to_string()));
    }

    // Digits only, so the parse can fail on overflow alone.
    let magnitude = unsigned[..digits_len].parse::<u64>().unwrap_or(u64::MAX);
    if negative && magnitude > 0 {
        let value = i64::try_from(magnitude).map_or(i64::MIN, |m| -m);
        return Err(VoteInputError::Negative(value));
    }
    Ok(magnitude)
}
