mod config;

pub use config::{Config, GoalConfig, PlanConfig};

use std::path::PathBuf;

/// Returns `~/.config/now-and-later[-dev]/` based on NOW_AND_LATER_ENV.
///
/// Set NOW_AND_LATER_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("NOW_AND_LATER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("now-and-later-dev")
    } else {
        base_dir.join("now-and-later")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
