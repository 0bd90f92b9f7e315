//! # now-and-later Core Library
//!
//! Job scheduling for humans: recurring goals that remind you ahead of time,
//! ask you to act on schedule, and nag until you mark them done.
//!
//! ## Architecture
//!
//! - **Timer**: last/next timestamps plus a callback for one kind of event
//! - **Goal**: a three-state machine (`new`, `idle`, `active`) driven by four
//!   triggers (`preempt`, `act`, `snooze`, `complete`), each guarded by a timer
//! - **Scheduler**: read-only planner listing due goals by priority
//! - **Storage**: TOML goal definitions with human-readable durations
//!
//! Nothing runs on its own. A driver polls the readiness predicates and fires
//! triggers; "now" always comes from an injected [`Clock`].
//!
//! ## Key Components
//!
//! - [`Goal`]: Per-goal state machine
//! - [`Timer`]: Passive event timer
//! - [`Scheduler`]: Priority planner over many goals
//! - [`Config`]: Goal configuration management

pub mod clock;
pub mod duration;
pub mod error;
pub mod events;
pub mod goal;
pub mod scheduler;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use duration::{format_duration, parse_duration};
pub use error::{ConfigError, CoreError, TimerError, TransitionError, ValidationError};
pub use events::Transition;
pub use goal::{Goal, GoalBuilder, GoalSnapshot, GoalState, Rejection, TimerSnapshot, Trigger};
pub use scheduler::{PlanSlot, PlannedGoal, Scheduler, MAX_PLAN_SLOTS};
pub use storage::{Config, GoalConfig, PlanConfig};
pub use timer::{Callback, Timer, TimerKind};
