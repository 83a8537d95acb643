pub mod config;
pub mod menu;
pub mod project;
pub mod schedule;

/// Error type shared by every command.
pub type CmdResult = Result<(), Box<dyn std::error::Error>>;
