mod callback;
mod event_timer;
mod kind;

pub use callback::Callback;
pub use event_timer::Timer;
pub use kind::TimerKind;
