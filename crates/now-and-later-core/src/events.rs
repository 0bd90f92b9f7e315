use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::goal::{GoalState, Trigger};

/// Every successful trigger produces a Transition.
/// Drivers can log it, print it, or feed it to whatever records history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub goal: String,
    pub trigger: Trigger,
    pub from: GoalState,
    pub to: GoalState,
    pub at: DateTime<Utc>,
}
