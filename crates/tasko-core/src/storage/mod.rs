mod config;
pub mod database;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;

/// Returns `~/.config/tasko[-dev]/` based on TASKO_ENV.
///
/// Set TASKO_ENV=dev to use the development data directory, or
/// TASKO_DATA_DIR to point somewhere else entirely (tests do this).
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let dir = match std::env::var("TASKO_DATA_DIR") {
        Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TASKO_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tasko-dev")
            } else {
                base_dir.join("tasko")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
