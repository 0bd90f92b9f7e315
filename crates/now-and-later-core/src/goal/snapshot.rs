use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GoalState;
use crate::timer::TimerKind;

/// Read-only view of one timer slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub kind: TimerKind,
    pub last: Option<DateTime<Utc>>,
    pub next: Option<DateTime<Utc>>,
}

/// Full read-only view of a goal, for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSnapshot {
    pub name: String,
    pub state: GoalState,
    pub priority: f64,
    pub default_priority: f64,
    pub action_duration_secs: i64,
    pub preempt_duration_secs: Option<i64>,
    pub snooze_duration_secs: Option<i64>,
    /// Only the slots the goal actually has, in preempt/action/snooze/completion order.
    pub timers: Vec<TimerSnapshot>,
    pub at: DateTime<Utc>,
}

impl GoalSnapshot {
    pub fn timer(&self, kind: TimerKind) -> Option<&TimerSnapshot> {
        self.timers.iter().find(|t| t.kind == kind)
    }
}
