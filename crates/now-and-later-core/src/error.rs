//! Core error types for now-and-later-core.
//!
//! Every failure in the core is reported synchronously through one of the
//! enums below; nothing is retried. [`CoreError`] wraps them for callers that
//! only care that "something went wrong".

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::goal::{GoalState, Rejection, Trigger};

/// Core error type for now-and-later-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A timer was queried or run without its preconditions.
    #[error("Invalid timer state: {0}")]
    Timer(#[from] TimerError),

    /// A goal trigger was rejected by the state machine.
    #[error("Illegal transition: {0}")]
    Transition(#[from] TransitionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Timer precondition violations.
///
/// These are usage errors: a timer was asked whether it is ready before it was
/// ever scheduled, or was run before it became ready.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// `is_ready` was called while `next` is unset.
    #[error("timer '{timer}' has no next time scheduled")]
    Unscheduled { timer: String },

    /// `run` was called at or before the timer's `next` time.
    #[error("timer '{timer}' is not ready until after {next} (now {now})")]
    NotReady {
        timer: String,
        next: DateTime<Utc>,
        now: DateTime<Utc>,
    },
}

/// A trigger that the goal's state machine refused.
///
/// No effect of the trigger has been applied when this is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot {trigger} goal '{goal}' while {state}: {reason}")]
pub struct TransitionError {
    pub goal: String,
    pub trigger: Trigger,
    pub state: GoalState,
    pub reason: Rejection,
}

/// Configuration-specific errors, including every goal construction failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// A duration string that is empty, unparsable, or adds up to zero.
    #[error("duration '{input}' is not able to be parsed or must be a positive value")]
    InvalidDuration { input: String },

    /// A structured duration below zero.
    #[error("{field} for goal '{goal}' must not be negative")]
    NegativeDuration { goal: String, field: &'static str },

    /// A timer was supplied for a slot that has no paired duration.
    #[error("goal '{goal}' has a {timer} timer but no {timer} duration")]
    MissingDuration { goal: String, timer: &'static str },

    /// Priorities must be ordinary numbers so goals can be sorted.
    #[error("priority {value} for goal '{goal}' is not a finite number")]
    InvalidPriority { goal: String, value: f64 },

    /// A goal declared as never run already carries history.
    #[error("goal '{goal}' is new but already has a last {timer} time")]
    FreshGoalHasHistory { goal: String, timer: &'static str },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Planning step that would never advance.
    #[error("Invalid step {step}: must be a positive duration")]
    NonPositiveStep { step: chrono::Duration },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
