//! Goal states, triggers, and the pure transition table.
//!
//! ```text
//!            preempt            preempt
//!           ┌──────┐           ┌──────┐
//!           v      │           v      │
//!   NEW ───────────┴──> IDLE ─────────┘
//!    │                  ^  │
//!    │ act     complete │  │ act
//!    │                  │  v
//!    └──────────────> ACTIVE ──┐
//!                        ^     │ snooze
//!                        └─────┘
//! ```
//!
//! [`transition`] decides, from the current state and a snapshot of timer
//! readiness, either the destination state plus the ordered effects to apply,
//! or why the trigger is rejected. It does no I/O and mutates nothing, so a
//! goal can evaluate it completely before touching any of its timers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timer::TimerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalState {
    /// Freshly built; never acted upon.
    #[default]
    New,
    /// Waiting for the next main action.
    Idle,
    /// Main action fired, waiting for completion.
    Active,
}

impl GoalState {
    /// Triggers whose source-state requirement this state satisfies.
    pub fn valid_triggers(&self) -> &'static [Trigger] {
        match self {
            GoalState::New | GoalState::Idle => &[Trigger::Preempt, Trigger::Act],
            GoalState::Active => &[Trigger::Snooze, Trigger::Complete],
        }
    }

    pub fn accepts(&self, trigger: Trigger) -> bool {
        self.valid_triggers().contains(&trigger)
    }
}

impl fmt::Display for GoalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GoalState::New => "new",
            GoalState::Idle => "idle",
            GoalState::Active => "active",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Preempt,
    Act,
    Snooze,
    Complete,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trigger::Preempt => "preempt",
            Trigger::Act => "act",
            Trigger::Snooze => "snooze",
            Trigger::Complete => "complete",
        })
    }
}

/// Why a trigger was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "timer")]
pub enum Rejection {
    /// The trigger is not legal from the current state.
    WrongState,
    /// The goal has no timer for the trigger's slot.
    MissingTimer(TimerKind),
    /// The timer exists but is disarmed or not yet due.
    NotReady(TimerKind),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::WrongState => f.write_str("not allowed from this state"),
            Rejection::MissingTimer(kind) => write!(f, "goal has no {kind} timer"),
            Rejection::NotReady(kind) => write!(f, "{kind} timer is not ready"),
        }
    }
}

/// Readiness of one timer slot at a sampled instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Readiness {
    Absent,
    Unscheduled,
    Pending,
    Ready,
}

impl Readiness {
    fn require(self, kind: TimerKind) -> Result<(), Rejection> {
        match self {
            Readiness::Ready => Ok(()),
            Readiness::Absent => Err(Rejection::MissingTimer(kind)),
            Readiness::Unscheduled | Readiness::Pending => Err(Rejection::NotReady(kind)),
        }
    }
}

/// Readiness of the guarded slots, sampled once per trigger.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Guards {
    pub preempt: Readiness,
    pub action: Readiness,
    pub snooze: Readiness,
}

/// One step of a transition's side effects, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    /// `snooze.next = now + snooze_duration`, if the goal snoozes.
    ArmSnooze,
    Fire(TimerKind),
    /// `timer.last = now`
    MarkLast(TimerKind),
    /// `timer.next = None`
    Disarm(TimerKind),
    Reschedule,
    ResetPriority,
}

const PREEMPT_EFFECTS: &[Effect] = &[
    Effect::Fire(TimerKind::Preempt),
    Effect::MarkLast(TimerKind::Preempt),
    Effect::Disarm(TimerKind::Preempt),
];

const ACT_EFFECTS: &[Effect] = &[
    Effect::ArmSnooze,
    Effect::Fire(TimerKind::Action),
    Effect::MarkLast(TimerKind::Action),
    Effect::Disarm(TimerKind::Action),
];

const SNOOZE_EFFECTS: &[Effect] = &[
    Effect::Fire(TimerKind::Snooze),
    Effect::MarkLast(TimerKind::Snooze),
    Effect::ArmSnooze,
];

const COMPLETE_EFFECTS: &[Effect] = &[
    Effect::Fire(TimerKind::Completion),
    Effect::MarkLast(TimerKind::Completion),
    Effect::Reschedule,
    Effect::ResetPriority,
];

/// Decide the outcome of `trigger` fired from `state`.
///
/// The source state is checked before the guard, so a trigger from the wrong
/// state always reports [`Rejection::WrongState`].
pub(crate) fn transition(
    state: GoalState,
    trigger: Trigger,
    guards: &Guards,
) -> Result<(GoalState, &'static [Effect]), Rejection> {
    use GoalState::*;

    match (state, trigger) {
        (New | Idle, Trigger::Preempt) => {
            guards.preempt.require(TimerKind::Preempt)?;
            Ok((Idle, PREEMPT_EFFECTS))
        }
        (New | Idle, Trigger::Act) => {
            guards.action.require(TimerKind::Action)?;
            Ok((Active, ACT_EFFECTS))
        }
        (Active, Trigger::Snooze) => {
            guards.snooze.require(TimerKind::Snooze)?;
            Ok((Active, SNOOZE_EFFECTS))
        }
        (Active, Trigger::Complete) => Ok((Idle, COMPLETE_EFFECTS)),
        (New | Idle, Trigger::Snooze | Trigger::Complete)
        | (Active, Trigger::Preempt | Trigger::Act) => Err(Rejection::WrongState),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_READY: Guards = Guards {
        preempt: Readiness::Ready,
        action: Readiness::Ready,
        snooze: Readiness::Ready,
    };

    const TRIGGERS: [Trigger; 4] = [
        Trigger::Preempt,
        Trigger::Act,
        Trigger::Snooze,
        Trigger::Complete,
    ];

    #[test]
    fn destinations_when_guards_pass() {
        let cases = [
            (GoalState::New, Trigger::Preempt, GoalState::Idle),
            (GoalState::Idle, Trigger::Preempt, GoalState::Idle),
            (GoalState::New, Trigger::Act, GoalState::Active),
            (GoalState::Idle, Trigger::Act, GoalState::Active),
            (GoalState::Active, Trigger::Snooze, GoalState::Active),
            (GoalState::Active, Trigger::Complete, GoalState::Idle),
        ];
        for (from, trigger, to) in cases {
            let (dest, _) = transition(from, trigger, &ALL_READY).unwrap();
            assert_eq!(dest, to, "{from} --{trigger}-->");
        }
    }

    #[test]
    fn wrong_source_state_is_rejected_regardless_of_guards() {
        for state in [GoalState::New, GoalState::Idle, GoalState::Active] {
            for trigger in TRIGGERS {
                let result = transition(state, trigger, &ALL_READY);
                assert_eq!(result.is_ok(), state.accepts(trigger));
                if !state.accepts(trigger) {
                    assert_eq!(result.unwrap_err(), Rejection::WrongState);
                }
            }
        }
    }

    #[test]
    fn guards_name_the_failing_timer() {
        let guards = Guards {
            preempt: Readiness::Absent,
            action: Readiness::Pending,
            snooze: Readiness::Unscheduled,
        };
        assert_eq!(
            transition(GoalState::Idle, Trigger::Preempt, &guards).unwrap_err(),
            Rejection::MissingTimer(TimerKind::Preempt)
        );
        assert_eq!(
            transition(GoalState::New, Trigger::Act, &guards).unwrap_err(),
            Rejection::NotReady(TimerKind::Action)
        );
        assert_eq!(
            transition(GoalState::Active, Trigger::Snooze, &guards).unwrap_err(),
            Rejection::NotReady(TimerKind::Snooze)
        );
        // Completion is unguarded.
        assert!(transition(GoalState::Active, Trigger::Complete, &guards).is_ok());
    }

    #[test]
    fn act_arms_snooze_before_running_the_callback() {
        let (_, effects) = transition(GoalState::New, Trigger::Act, &ALL_READY).unwrap();
        assert_eq!(effects.first(), Some(&Effect::ArmSnooze));
        assert_eq!(effects.last(), Some(&Effect::Disarm(TimerKind::Action)));
    }

    #[test]
    fn complete_reschedules_then_resets_priority() {
        let (_, effects) = transition(GoalState::Active, Trigger::Complete, &ALL_READY).unwrap();
        assert_eq!(
            effects,
            &[
                Effect::Fire(TimerKind::Completion),
                Effect::MarkLast(TimerKind::Completion),
                Effect::Reschedule,
                Effect::ResetPriority,
            ]
        );
    }
}
