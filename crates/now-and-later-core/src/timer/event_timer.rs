//! A single named timer: when it last fired, when it may fire next, and what
//! to call when it does.
//!
//! A timer is passive. It answers "is it time yet" for a caller-supplied
//! instant and invokes its callback on request; it never updates its own
//! `last`/`next`. The owning goal does that as part of a state transition.

use chrono::{DateTime, Utc};

use super::Callback;
use crate::error::TimerError;

#[derive(Debug, Default)]
pub struct Timer {
    name: String,
    last: Option<DateTime<Utc>>,
    /// Earliest time the timer may fire. `None` means disarmed.
    next: Option<DateTime<Utc>>,
    callback: Callback,
}

impl Timer {
    /// Create an unscheduled timer with the logging callback.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_last(mut self, last: DateTime<Utc>) -> Self {
        self.last = Some(last);
        self
    }

    pub fn with_next(mut self, next: DateTime<Utc>) -> Self {
        self.next = Some(next);
        self
    }

    pub fn with_callback(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.callback = Callback::custom(callback);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.last
    }

    pub fn next(&self) -> Option<DateTime<Utc>> {
        self.next
    }

    pub fn is_armed(&self) -> bool {
        self.next.is_some()
    }

    /// True iff `now` is strictly after `next`.
    ///
    /// # Errors
    ///
    /// Returns [`TimerError::Unscheduled`] if `next` has never been set or the
    /// timer was disarmed.
    pub fn is_ready(&self, now: DateTime<Utc>) -> Result<bool, TimerError> {
        match self.next {
            Some(next) => Ok(now > next),
            None => Err(TimerError::Unscheduled {
                timer: self.name.clone(),
            }),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_last(&mut self, last: Option<DateTime<Utc>>) {
        self.last = last;
    }

    /// `None` disarms the timer until it is set again.
    pub fn set_next(&mut self, next: Option<DateTime<Utc>>) {
        self.next = next;
    }

    pub fn set_callback(&mut self, callback: Callback) {
        self.callback = callback;
    }

    /// Invoke the callback if the timer is ready at `now`.
    ///
    /// # Errors
    ///
    /// Fails without invoking the callback if the timer is unscheduled or
    /// `now` is not yet past `next`.
    pub fn run(&mut self, now: DateTime<Utc>) -> Result<(), TimerError> {
        if !self.is_ready(now)? {
            return Err(TimerError::NotReady {
                timer: self.name.clone(),
                next: self.next.unwrap_or(now),
                now,
            });
        }
        self.fire();
        Ok(())
    }

    /// Invoke the callback unconditionally. The goal calls this only after its
    /// own guards have passed.
    pub(crate) fn fire(&mut self) {
        self.callback.invoke(&self.name);
    }
}
