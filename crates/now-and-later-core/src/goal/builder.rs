//! Goal construction and validation.
//!
//! Everything that can make a goal invalid is checked here, so a [`Goal`]
//! that exists always satisfies its invariants: a preempt timer exists iff a
//! preempt duration does (same for snooze), and the action timer is scheduled.
//!
//! The builder also restores goals from earlier history: give it an initial
//! state and timers that carry `last` timestamps.

use std::sync::Arc;

use chrono::Duration;

use super::{Goal, GoalState};
use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;
use crate::timer::{Callback, Timer, TimerKind};

const DEFAULT_PRIORITY: f64 = 1.0;

pub struct GoalBuilder {
    name: String,
    action_duration: Duration,
    priority: f64,
    preempt_duration: Option<Duration>,
    snooze_duration: Option<Duration>,
    preempt: Option<Timer>,
    action: Option<Timer>,
    snooze: Option<Timer>,
    completion: Option<Timer>,
    state: GoalState,
    clock: Option<Arc<dyn Clock>>,
}

impl GoalBuilder {
    pub fn new(name: impl Into<String>, action_duration: Duration) -> Self {
        Self {
            name: name.into(),
            action_duration,
            priority: DEFAULT_PRIORITY,
            preempt_duration: None,
            snooze_duration: None,
            preempt: None,
            action: None,
            snooze: None,
            completion: None,
            state: GoalState::New,
            clock: None,
        }
    }

    /// Also the value `complete` resets the priority to.
    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    /// Lead time before the main action at which the preempt reminder fires.
    pub fn preempt(mut self, lead: Duration) -> Self {
        self.preempt_duration = Some(lead);
        self
    }

    /// Interval between nags after the main action, until completion.
    pub fn snooze(mut self, every: Duration) -> Self {
        self.snooze_duration = Some(every);
        self
    }

    pub fn preempt_timer(mut self, timer: Timer) -> Self {
        self.preempt = Some(timer);
        self
    }

    pub fn action_timer(mut self, timer: Timer) -> Self {
        self.action = Some(timer);
        self
    }

    pub fn snooze_timer(mut self, timer: Timer) -> Self {
        self.snooze = Some(timer);
        self
    }

    pub fn completion_timer(mut self, timer: Timer) -> Self {
        self.completion = Some(timer);
        self
    }

    pub fn on_preempt(self, f: impl FnMut() + Send + 'static) -> Self {
        self.with_callback(TimerKind::Preempt, Callback::custom(f))
    }

    pub fn on_act(self, f: impl FnMut() + Send + 'static) -> Self {
        self.with_callback(TimerKind::Action, Callback::custom(f))
    }

    pub fn on_snooze(self, f: impl FnMut() + Send + 'static) -> Self {
        self.with_callback(TimerKind::Snooze, Callback::custom(f))
    }

    pub fn on_complete(self, f: impl FnMut() + Send + 'static) -> Self {
        self.with_callback(TimerKind::Completion, Callback::custom(f))
    }

    /// Initial state, for goals reloaded from history. Defaults to `new`.
    pub fn state(mut self, state: GoalState) -> Self {
        self.state = state;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate and schedule the goal.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidPriority`] for a NaN or infinite priority.
    /// - [`ConfigError::NegativeDuration`] for any duration below zero.
    /// - [`ConfigError::MissingDuration`] for a preempt or snooze timer without
    ///   its duration.
    /// - [`ConfigError::FreshGoalHasHistory`] when the state is `new` but the
    ///   action or completion timer already has a `last` time.
    pub fn build(self) -> Result<Goal, ConfigError> {
        let name = self.name;
        if !self.priority.is_finite() {
            return Err(ConfigError::InvalidPriority {
                goal: name,
                value: self.priority,
            });
        }

        for (field, duration) in [
            ("action duration", Some(self.action_duration)),
            ("preempt duration", self.preempt_duration),
            ("snooze duration", self.snooze_duration),
        ] {
            if duration.is_some_and(|d| d < Duration::zero()) {
                return Err(ConfigError::NegativeDuration { goal: name, field });
            }
        }

        let preempt = paired(&name, TimerKind::Preempt, self.preempt, self.preempt_duration)?;
        let snooze = paired(&name, TimerKind::Snooze, self.snooze, self.snooze_duration)?;
        let action = self
            .action
            .unwrap_or_else(|| default_timer(&name, TimerKind::Action));
        let completion = self
            .completion
            .unwrap_or_else(|| default_timer(&name, TimerKind::Completion));

        if self.state == GoalState::New {
            for (kind, timer) in [(TimerKind::Action, &action), (TimerKind::Completion, &completion)] {
                if timer.last().is_some() {
                    return Err(ConfigError::FreshGoalHasHistory {
                        goal: name,
                        timer: kind.as_str(),
                    });
                }
            }
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let now = clock.now();
        let mut goal = Goal {
            name,
            action_duration: self.action_duration,
            preempt_duration: self.preempt_duration,
            snooze_duration: self.snooze_duration,
            priority: self.priority,
            default_priority: self.priority,
            action,
            preempt,
            snooze,
            completion,
            state: self.state,
            clock,
        };

        goal.reschedule(now);
        if goal.state == GoalState::Active {
            // Same shape as right after `act`.
            goal.action.set_next(None);
            let acted = goal.action.last().unwrap_or(now);
            goal.arm_snooze(acted);
        }

        tracing::debug!(
            goal = %goal.name,
            state = %goal.state,
            next_main_action = ?goal.action.next(),
            "goal built"
        );
        Ok(goal)
    }

    fn with_callback(mut self, kind: TimerKind, callback: Callback) -> Self {
        let name = self.name.clone();
        let slot = match kind {
            TimerKind::Preempt => &mut self.preempt,
            TimerKind::Action => &mut self.action,
            TimerKind::Snooze => &mut self.snooze,
            TimerKind::Completion => &mut self.completion,
        };
        slot.get_or_insert_with(|| default_timer(&name, kind))
            .set_callback(callback);
        self
    }
}

fn default_timer(goal: &str, kind: TimerKind) -> Timer {
    Timer::new(format!("{goal} {kind}"))
}

/// A preempt/snooze slot needs its duration; the duration alone gets a
/// default timer.
fn paired(
    goal: &str,
    kind: TimerKind,
    timer: Option<Timer>,
    duration: Option<Duration>,
) -> Result<Option<Timer>, ConfigError> {
    match (timer, duration) {
        (Some(_), None) => Err(ConfigError::MissingDuration {
            goal: goal.to_string(),
            timer: kind.as_str(),
        }),
        (Some(timer), Some(_)) => Ok(Some(timer)),
        (None, Some(_)) => Ok(Some(default_timer(goal, kind))),
        (None, None) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{DateTime, TimeZone, Utc};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn preempt_or_snooze_timer_without_duration_is_rejected() {
        let err = Goal::builder("goal", Duration::days(1))
            .preempt_timer(Timer::new("preempt"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingDuration { timer: "preempt", .. }));

        let err = Goal::builder("goal", Duration::days(1))
            .snooze_timer(Timer::new("snooze"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingDuration { timer: "snooze", .. }));

        let err = Goal::builder("goal", Duration::days(1))
            .on_snooze(|| {})
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingDuration { timer: "snooze", .. }));
    }

    #[test]
    fn duration_alone_creates_the_timer() {
        let goal = Goal::builder("goal", Duration::days(1))
            .preempt(Duration::hours(1))
            .snooze(Duration::hours(2))
            .build()
            .unwrap();
        assert_eq!(goal.timer(TimerKind::Preempt).unwrap().name(), "goal preempt");
        assert_eq!(goal.timer(TimerKind::Snooze).unwrap().name(), "goal snooze");
        assert!(goal.next_preempt_action().is_some());
        assert!(goal.next_snooze_action().is_none());
    }

    #[test]
    fn goals_without_optional_durations_have_no_optional_timers() {
        let goal = Goal::new("goal", Duration::days(1), 1.0).unwrap();
        assert!(goal.timer(TimerKind::Preempt).is_none());
        assert!(goal.timer(TimerKind::Snooze).is_none());
        assert!(goal.timer(TimerKind::Action).is_some());
        assert!(goal.timer(TimerKind::Completion).is_some());
    }

    #[test]
    fn negative_durations_are_rejected() {
        let err = Goal::builder("goal", Duration::days(-1)).build().unwrap_err();
        assert!(matches!(err, ConfigError::NegativeDuration { field: "action duration", .. }));

        let err = Goal::builder("goal", Duration::days(1))
            .snooze(Duration::seconds(-5))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::NegativeDuration { field: "snooze duration", .. }));
    }

    #[test]
    fn non_finite_priority_is_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = Goal::builder("goal", Duration::days(1))
                .priority(value)
                .build()
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidPriority { .. }));
        }
    }

    #[test]
    fn names_are_kept() {
        for name in ["Goal", "Goal1", "MyGoal"] {
            assert_eq!(Goal::new(name, Duration::days(1), 1.0).unwrap().name(), name);
        }
    }

    #[test]
    fn explicit_timer_schedules_are_recomputed() {
        let clock = ManualClock::shared(t0());
        let goal = Goal::builder("goal", Duration::days(2))
            .preempt(Duration::days(1))
            .preempt_timer(Timer::new("preempt").with_next(t0()))
            .action_timer(Timer::new("action").with_next(t0()))
            .clock(clock)
            .build()
            .unwrap();
        assert_eq!(goal.next_main_action(), Some(t0() + Duration::days(2)));
        assert_eq!(goal.next_preempt_action(), Some(t0() + Duration::days(1)));
    }

    #[test]
    fn new_goal_with_history_is_a_state_error() {
        let err = Goal::builder("goal", Duration::days(1))
            .completion_timer(Timer::new("completion").with_last(t0()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FreshGoalHasHistory { timer: "completion", .. }));

        let err = Goal::builder("goal", Duration::days(1))
            .action_timer(Timer::new("action").with_last(t0()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FreshGoalHasHistory { timer: "action", .. }));
    }

    #[test]
    fn restored_idle_goal_schedules_from_last_completion() {
        let clock = ManualClock::shared(t0() + Duration::days(30));
        let goal = Goal::builder("goal", Duration::days(7))
            .preempt(Duration::days(1))
            .state(GoalState::Idle)
            .completion_timer(Timer::new("completion").with_last(t0()))
            .clock(clock)
            .build()
            .unwrap();
        assert_eq!(goal.state(), GoalState::Idle);
        assert_eq!(goal.next_main_action(), Some(t0() + Duration::days(7)));
        assert_eq!(goal.next_preempt_action(), Some(t0() + Duration::days(6)));
        assert!(goal.main_action_ready());
    }

    #[test]
    fn restored_active_goal_waits_for_completion() {
        let acted = t0() + Duration::days(1);
        let clock = ManualClock::shared(t0() + Duration::days(2));
        let mut goal = Goal::builder("goal", Duration::days(7))
            .snooze(Duration::hours(12))
            .state(GoalState::Active)
            .action_timer(Timer::new("action").with_last(acted))
            .clock(clock)
            .build()
            .unwrap();
        assert_eq!(goal.next_main_action(), None);
        assert_eq!(goal.next_snooze_action(), Some(acted + Duration::hours(12)));
        assert!(goal.snooze_ready());
        assert!(!goal.main_action_ready());
        goal.complete().unwrap();
        assert_eq!(goal.state(), GoalState::Idle);
    }
}
