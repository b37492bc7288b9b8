//! Subcommand implementations

pub mod replay;
pub mod verify;
