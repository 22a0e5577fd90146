//! Domain types and wire payloads shared by the character client crates.

pub mod domain;
pub mod error;
pub mod protocol;
