mod builder;
mod machine;
mod snapshot;
mod state;

pub use builder::GoalBuilder;
pub use machine::Goal;
pub use snapshot::{GoalSnapshot, TimerSnapshot};
pub use state::{GoalState, Rejection, Trigger};
