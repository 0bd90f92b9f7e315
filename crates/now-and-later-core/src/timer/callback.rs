use std::fmt;

/// What a timer does when it fires.
///
/// Timers without a user-supplied closure get the explicit [`Callback::Log`]
/// observer, so the timer itself never has to know about logging.
#[derive(Default)]
pub enum Callback {
    /// Only records that the timer fired.
    #[default]
    Log,
    /// A closure supplied by the goal's owner.
    Custom(Box<dyn FnMut() + Send>),
}

impl Callback {
    pub fn custom(f: impl FnMut() + Send + 'static) -> Self {
        Callback::Custom(Box::new(f))
    }

    pub(crate) fn invoke(&mut self, timer: &str) {
        match self {
            Callback::Log => tracing::info!(timer, "Running callback in '{timer}' timer"),
            Callback::Custom(f) => f(),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Log => f.write_str("Callback::Log"),
            Callback::Custom(_) => f.write_str("Callback::Custom(..)"),
        }
    }
}

