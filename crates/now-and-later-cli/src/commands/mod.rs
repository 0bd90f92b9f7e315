pub mod check;
pub mod config;
pub mod plan;
pub mod status;

use std::path::Path;
use std::sync::Arc;

use now_and_later_core::{Config, ConfigError, Goal, SystemClock};

/// Load the goals file from `path`, or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Build every configured goal against the wall clock.
pub fn load_goals(config: &Config) -> Result<Vec<Goal>, ConfigError> {
    config.build_goals(Arc::new(SystemClock))
}
