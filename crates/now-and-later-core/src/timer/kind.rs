use std::fmt;

use serde::{Deserialize, Serialize};

/// The four timer slots a goal can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerKind {
    Preempt,
    Action,
    Snooze,
    Completion,
}

impl TimerKind {
    pub const ALL: [TimerKind; 4] = [
        TimerKind::Preempt,
        TimerKind::Action,
        TimerKind::Snooze,
        TimerKind::Completion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimerKind::Preempt => "preempt",
            TimerKind::Action => "action",
            TimerKind::Snooze => "snooze",
            TimerKind::Completion => "completion",
        }
    }
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
