//! Client-side state and HTTP plumbing for the character votes front-ends.

pub mod config;
pub mod session;
pub mod store;

pub use config::{load_settings, Settings};
pub use session::{CharacterSession, RosterEntry, SessionError, SessionSnapshot, VoteChange};
pub use store::{HttpCharacterStore, RemoteStore, StoreError};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
