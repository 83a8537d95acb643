mod config;
pub mod migrations;
pub mod project_db;

pub use config::{Config, LoggingConfig, ScheduleConfig};
pub use project_db::ProjectDb;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the directory holding `promanage.db` and `config.toml`.
///
/// `PROMANAGE_HOME` overrides the location. Otherwise this is
/// `~/.config/promanage`, or `~/.config/promanage-dev` when
/// `PROMANAGE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("PROMANAGE_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PROMANAGE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("promanage-dev")
            } else {
                base_dir.join("promanage")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
