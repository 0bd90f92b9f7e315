//! The per-goal state machine.
//!
//! A [`Goal`] owns its timers and applies triggers atomically: it samples the
//! clock once, evaluates the pure transition table against a readiness
//! snapshot, and only then runs the resulting effects. A rejected trigger
//! leaves every timer, the priority and the state exactly as they were.
//!
//! ## Usage
//!
//! ```ignore
//! let mut goal = Goal::builder("Water plants", Duration::days(3))
//!     .priority(2.0)
//!     .preempt(Duration::hours(6))
//!     .build()?;
//! // In the driver's loop:
//! if goal.main_action_ready() {
//!     goal.act()?;
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::builder::GoalBuilder;
use super::snapshot::{GoalSnapshot, TimerSnapshot};
use super::state::{self, Effect, GoalState, Guards, Readiness, Trigger};
use crate::clock::Clock;
use crate::error::{ConfigError, TransitionError};
use crate::events::Transition;
use crate::timer::{Timer, TimerKind};

pub struct Goal {
    pub(super) name: String,
    pub(super) action_duration: Duration,
    pub(super) preempt_duration: Option<Duration>,
    pub(super) snooze_duration: Option<Duration>,
    pub(super) priority: f64,
    pub(super) default_priority: f64,
    pub(super) action: Timer,
    pub(super) preempt: Option<Timer>,
    pub(super) snooze: Option<Timer>,
    pub(super) completion: Timer,
    pub(super) state: GoalState,
    pub(super) clock: Arc<dyn Clock>,
}

impl Goal {
    /// Start building a goal that recurs every `action_duration`.
    pub fn builder(name: impl Into<String>, action_duration: Duration) -> GoalBuilder {
        GoalBuilder::new(name, action_duration)
    }

    /// A goal with no preempt or snooze, driven by the system clock.
    ///
    /// # Errors
    ///
    /// Fails if `action_duration` is negative or `priority` is not finite.
    pub fn new(
        name: impl Into<String>,
        action_duration: Duration,
        priority: f64,
    ) -> Result<Self, ConfigError> {
        GoalBuilder::new(name, action_duration)
            .priority(priority)
            .build()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> GoalState {
        self.state
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    pub fn default_priority(&self) -> f64 {
        self.default_priority
    }

    pub fn action_duration(&self) -> Duration {
        self.action_duration
    }

    pub fn preempt_duration(&self) -> Option<Duration> {
        self.preempt_duration
    }

    pub fn snooze_duration(&self) -> Option<Duration> {
        self.snooze_duration
    }

    /// `None` while the goal is active (the main action has fired and the
    /// schedule waits for completion).
    pub fn next_main_action(&self) -> Option<DateTime<Utc>> {
        self.action.next()
    }

    pub fn next_preempt_action(&self) -> Option<DateTime<Utc>> {
        self.preempt.as_ref().and_then(Timer::next)
    }

    pub fn next_snooze_action(&self) -> Option<DateTime<Utc>> {
        self.snooze.as_ref().and_then(Timer::next)
    }

    pub fn last_main_action(&self) -> Option<DateTime<Utc>> {
        self.action.last()
    }

    pub fn last_completion(&self) -> Option<DateTime<Utc>> {
        self.completion.last()
    }

    pub fn timer(&self, kind: TimerKind) -> Option<&Timer> {
        match kind {
            TimerKind::Preempt => self.preempt.as_ref(),
            TimerKind::Action => Some(&self.action),
            TimerKind::Snooze => self.snooze.as_ref(),
            TimerKind::Completion => Some(&self.completion),
        }
    }

    pub fn preempt_ready(&self) -> bool {
        self.permits(Trigger::Preempt)
    }

    pub fn main_action_ready(&self) -> bool {
        self.permits(Trigger::Act)
    }

    pub fn snooze_ready(&self) -> bool {
        self.permits(Trigger::Snooze)
    }

    /// Completion is unguarded; it only needs the goal to be active.
    pub fn can_complete(&self) -> bool {
        self.state.accepts(Trigger::Complete)
    }

    /// Whether `trigger` would succeed right now. Never mutates.
    pub fn permits(&self, trigger: Trigger) -> bool {
        let guards = self.guards(self.clock.now());
        state::transition(self.state, trigger, &guards).is_ok()
    }

    pub fn snapshot(&self) -> GoalSnapshot {
        GoalSnapshot {
            name: self.name.clone(),
            state: self.state,
            priority: self.priority,
            default_priority: self.default_priority,
            action_duration_secs: self.action_duration.num_seconds(),
            preempt_duration_secs: self.preempt_duration.map(|d| d.num_seconds()),
            snooze_duration_secs: self.snooze_duration.map(|d| d.num_seconds()),
            timers: TimerKind::ALL
                .iter()
                .filter_map(|&kind| {
                    self.timer(kind).map(|t| TimerSnapshot {
                        kind,
                        last: t.last(),
                        next: t.next(),
                    })
                })
                .collect(),
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_priority(&mut self, priority: f64) {
        self.priority = priority;
    }

    pub fn reset_priority(&mut self) {
        self.priority = self.default_priority;
    }

    /// Early reminder ahead of the main action.
    ///
    /// # Errors
    ///
    /// Rejected when active, when the goal has no preempt timer, or when the
    /// preempt timer is disarmed or not yet due.
    pub fn preempt(&mut self) -> Result<Transition, TransitionError> {
        self.trigger(Trigger::Preempt)
    }

    /// Fire the main action and wait for completion.
    ///
    /// # Errors
    ///
    /// Rejected when already active or when the action timer is not yet due.
    pub fn act(&mut self) -> Result<Transition, TransitionError> {
        self.trigger(Trigger::Act)
    }

    /// Nag again while the goal is still active.
    ///
    /// # Errors
    ///
    /// Rejected unless active with a due snooze timer.
    pub fn snooze(&mut self) -> Result<Transition, TransitionError> {
        self.trigger(Trigger::Snooze)
    }

    /// Mark the goal done and schedule the next round.
    ///
    /// # Errors
    ///
    /// Rejected unless active.
    pub fn complete(&mut self) -> Result<Transition, TransitionError> {
        self.trigger(Trigger::Complete)
    }

    /// Apply `trigger` at the clock's current instant.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] and changes nothing if the current state
    /// does not accept the trigger or its guard fails.
    pub fn trigger(&mut self, trigger: Trigger) -> Result<Transition, TransitionError> {
        let now = self.clock.now();
        let from = self.state;
        let (to, effects) = state::transition(from, trigger, &self.guards(now)).map_err(
            |reason| TransitionError {
                goal: self.name.clone(),
                trigger,
                state: from,
                reason,
            },
        )?;

        for &effect in effects {
            self.apply(effect, now);
        }
        self.state = to;

        tracing::debug!(goal = %self.name, %trigger, %from, %to, "goal transition");
        Ok(Transition {
            goal: self.name.clone(),
            trigger,
            from,
            to,
            at: now,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn guards(&self, now: DateTime<Utc>) -> Guards {
        Guards {
            preempt: self.readiness(TimerKind::Preempt, now),
            action: self.readiness(TimerKind::Action, now),
            snooze: self.readiness(TimerKind::Snooze, now),
        }
    }

    fn readiness(&self, kind: TimerKind, now: DateTime<Utc>) -> Readiness {
        match self.timer(kind).map(|t| t.is_ready(now)) {
            None => Readiness::Absent,
            Some(Err(_)) => Readiness::Unscheduled,
            Some(Ok(false)) => Readiness::Pending,
            Some(Ok(true)) => Readiness::Ready,
        }
    }

    fn timer_mut(&mut self, kind: TimerKind) -> Option<&mut Timer> {
        match kind {
            TimerKind::Preempt => self.preempt.as_mut(),
            TimerKind::Action => Some(&mut self.action),
            TimerKind::Snooze => self.snooze.as_mut(),
            TimerKind::Completion => Some(&mut self.completion),
        }
    }

    fn apply(&mut self, effect: Effect, now: DateTime<Utc>) {
        match effect {
            Effect::ArmSnooze => self.arm_snooze(now),
            Effect::Fire(kind) => {
                if let Some(timer) = self.timer_mut(kind) {
                    timer.fire();
                }
            }
            Effect::MarkLast(kind) => {
                if let Some(timer) = self.timer_mut(kind) {
                    timer.set_last(Some(now));
                }
            }
            Effect::Disarm(kind) => {
                if let Some(timer) = self.timer_mut(kind) {
                    timer.set_next(None);
                }
            }
            Effect::Reschedule => self.reschedule(now),
            Effect::ResetPriority => self.reset_priority(),
        }
    }

    pub(super) fn arm_snooze(&mut self, from: DateTime<Utc>) {
        if let (Some(timer), Some(every)) = (self.snooze.as_mut(), self.snooze_duration) {
            timer.set_next(Some(later(from, every)));
        }
    }

    /// Recompute the schedule from the last completion (or from `now` if the
    /// goal has never been completed).
    pub(super) fn reschedule(&mut self, now: DateTime<Utc>) {
        let base = self.completion.last().unwrap_or(now);
        let next_action = later(base, self.action_duration);
        self.action.set_next(Some(next_action));

        if let (Some(timer), Some(lead)) = (self.preempt.as_mut(), self.preempt_duration) {
            timer.set_next(Some(earlier(next_action, lead)));
        }
        if let Some(timer) = self.snooze.as_mut() {
            timer.set_next(None);
        }
    }
}

/// Saturating `t + d`.
fn later(t: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    t.checked_add_signed(d).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Saturating `t - d`.
fn earlier(t: DateTime<Utc>, d: Duration) -> DateTime<Utc> {
    t.checked_sub_signed(d).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

impl fmt::Debug for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Goal")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("priority", &self.priority)
            .field("action", &self.action)
            .field("preempt", &self.preempt)
            .field("snooze", &self.snooze)
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}
