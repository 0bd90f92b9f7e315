//! TOML-based goal configuration.
//!
//! Stores:
//! - The planning horizon and step used by `plan`
//! - One `[[goals]]` table per recurring goal
//!
//! Configuration is stored at `~/.config/now-and-later/goals.toml`.
//! Durations are human strings ("1 week", "2h30m") and are only parsed when
//! goals are built, so a bad value is reported with the goal it belongs to.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::clock::Clock;
use crate::duration::parse_duration;
use crate::error::ConfigError;
use crate::goal::Goal;

/// Planning horizon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    #[serde(default = "default_horizon")]
    pub horizon: String,
    #[serde(default = "default_step")]
    pub step: String,
}

/// One recurring goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalConfig {
    pub name: String,
    /// Period between completion and the next main action.
    pub every: String,
    #[serde(default = "default_priority")]
    pub priority: f64,
    /// Lead time for the early reminder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preempt: Option<String>,
    /// Nag interval after the main action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snooze: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/now-and-later/goals.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub plan: PlanConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<GoalConfig>,
}

// Default functions
fn default_horizon() -> String {
    "1 week".into()
}
fn default_step() -> String {
    "1 day".into()
}
fn default_priority() -> f64 {
    1.0
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
            step: default_step(),
        }
    }
}

impl PlanConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] for an unparsable horizon.
    pub fn horizon(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.horizon)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDuration`] for an unparsable step.
    pub fn step(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.step)
    }
}

impl GoalConfig {
    pub fn new(name: impl Into<String>, every: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            every: every.into(),
            priority: default_priority(),
            preempt: None,
            snooze: None,
        }
    }

    /// Parse the durations and build the goal against `clock`.
    ///
    /// # Errors
    ///
    /// Fails on any unparsable or zero duration, or whatever the goal builder
    /// rejects.
    pub fn build(&self, clock: Arc<dyn Clock>) -> Result<Goal, ConfigError> {
        let mut builder = Goal::builder(&self.name, parse_duration(&self.every)?)
            .priority(self.priority)
            .clock(clock);
        if let Some(preempt) = &self.preempt {
            builder = builder.preempt(parse_duration(preempt)?);
        }
        if let Some(snooze) = &self.snooze {
            builder = builder.snooze(parse_duration(snooze)?);
        }
        builder.build()
    }
}

impl Config {
    /// Default location of the goals file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/now-and-later"),
            message: e.to_string(),
        })?;
        Ok(dir.join("goals.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// [`Config::load`], falling back to an empty goal list when the goals
    /// file is unreadable or malformed. The failure is logged, not returned.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default goals config");
            Self::default()
        })
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] for invalid TOML or mistyped fields.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Check everything `build_goals` and `plan` would need, without a clock.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.plan.horizon()?;
        self.plan.step()?;

        let mut seen = HashSet::new();
        for goal in &self.goals {
            if goal.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "goals.name".into(),
                    message: "goal names must not be empty".into(),
                });
            }
            if !seen.insert(goal.name.as_str()) {
                return Err(ConfigError::InvalidValue {
                    key: "goals.name".into(),
                    message: format!("duplicate goal '{}'", goal.name),
                });
            }
            parse_duration(&goal.every)?;
            for lead in goal.preempt.iter().chain(goal.snooze.iter()) {
                parse_duration(lead)?;
            }
            if !goal.priority.is_finite() {
                return Err(ConfigError::InvalidPriority {
                    goal: goal.name.clone(),
                    value: goal.priority,
                });
            }
        }
        Ok(())
    }

    /// Build every configured goal, in file order.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid goal; no goals are returned in that case.
    pub fn build_goals(&self, clock: Arc<dyn Clock>) -> Result<Vec<Goal>, ConfigError> {
        self.validate()?;
        self.goals
            .iter()
            .map(|goal| goal.build(clock.clone()))
            .collect()
    }
}
