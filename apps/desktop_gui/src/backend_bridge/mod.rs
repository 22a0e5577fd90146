//! Backend worker: owns the character session and talks to the remote collection.

pub mod commands;
pub mod runtime;
