//! Multi-goal planner.
//!
//! The scheduler is a read-only consumer of goals: for every timestamp across
//! a horizon it lists the goals whose main action falls due before that
//! timestamp, highest priority first. It never fires triggers.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::goal::Goal;

/// Upper bound on the timestamps a single plan may hold.
pub const MAX_PLAN_SLOTS: i64 = 100_000;

/// One goal as it appears in a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedGoal {
    pub name: String,
    pub priority: f64,
    pub next_main_action: Option<DateTime<Utc>>,
}

impl From<&Goal> for PlannedGoal {
    fn from(goal: &Goal) -> Self {
        Self {
            name: goal.name().to_string(),
            priority: goal.priority(),
            next_main_action: goal.next_main_action(),
        }
    }
}

/// The goals due at one point of the horizon, in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSlot {
    pub at: DateTime<Utc>,
    pub goals: Vec<PlannedGoal>,
}

impl fmt::Display for PlanSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.at.format("%Y-%m-%d %H:%M"))?;
        for goal in &self.goals {
            writeln!(f, "  {}: {}", goal.name, goal.priority)?;
        }
        Ok(())
    }
}

/// Holds goals in insertion order and reports which are due when.
#[derive(Debug, Default)]
pub struct Scheduler {
    goals: Vec<Goal>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_goal(&mut self, goal: Goal) {
        self.goals.push(goal);
    }

    pub fn add_goals(&mut self, goals: impl IntoIterator<Item = Goal>) {
        self.goals.extend(goals);
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Drivers fire triggers through this; the scheduler itself never does.
    pub fn goals_mut(&mut self) -> &mut [Goal] {
        &mut self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Timestamps from `start`, stepping by `step` until `start + horizon` is
    /// reached. The last value may overshoot the end by less than one step.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveStep`] when `step` would never
    /// advance, and [`ValidationError::InvalidValue`] when the horizon spans
    /// more than [`MAX_PLAN_SLOTS`] steps.
    pub fn datetime_range(
        start: DateTime<Utc>,
        horizon: Duration,
        step: Duration,
    ) -> Result<Vec<DateTime<Utc>>, ValidationError> {
        if step <= Duration::zero() {
            return Err(ValidationError::NonPositiveStep { step });
        }
        let steps = horizon.num_milliseconds() / step.num_milliseconds().max(1);
        if steps >= MAX_PLAN_SLOTS {
            return Err(ValidationError::InvalidValue {
                field: "horizon".into(),
                message: format!("{steps} steps of {step} exceed the limit of {MAX_PLAN_SLOTS} plan slots"),
            });
        }
        let end = start
            .checked_add_signed(horizon)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut at = start;
        let mut out = vec![at];
        while at < end {
            at = match at.checked_add_signed(step) {
                Some(next) => next,
                None => break,
            };
            out.push(at);
        }
        Ok(out)
    }

    /// Goals whose main action is scheduled strictly before `at`, in
    /// insertion order. Active goals (no scheduled main action) are never due.
    pub fn due_at(&self, at: DateTime<Utc>) -> Vec<&Goal> {
        self.goals
            .iter()
            .filter(|g| g.next_main_action().is_some_and(|next| next < at))
            .collect()
    }

    /// [`Self::due_at`], highest priority first. Ties keep insertion order.
    pub fn prioritize(&self, at: DateTime<Utc>) -> Vec<&Goal> {
        let mut due = self.due_at(at);
        due.sort_by(|a, b| b.priority().total_cmp(&a.priority()));
        due
    }

    /// Prioritized due goals at every step of the horizon.
    ///
    /// # Errors
    ///
    /// Fails when `step` is not positive.
    pub fn plan(
        &self,
        start: DateTime<Utc>,
        horizon: Duration,
        step: Duration,
    ) -> Result<Vec<PlanSlot>, ValidationError> {
        let slots: Vec<PlanSlot> = Self::datetime_range(start, horizon, step)?
            .into_iter()
            .map(|at| PlanSlot {
                at,
                goals: self.prioritize(at).into_iter().map(PlannedGoal::from).collect(),
            })
            .collect();

        tracing::debug!(
            goals = self.goals.len(),
            slots = slots.len(),
            "plan generated"
        );
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    fn family() -> Scheduler {
        let clock = ManualClock::shared(t0());
        let goal = |name: &str, priority: f64| {
            Goal::builder(name, Duration::days(1))
                .priority(priority)
                .clock(clock.clone())
                .build()
                .unwrap()
        };
        let mut scheduler = Scheduler::new();
        scheduler.add_goals([
            goal("Call Dad", 2.0),
            goal("Call Mom", 3.0),
            goal("Call Heather", 2.5),
        ]);
        scheduler
    }

    #[test]
    fn prioritize_sorts_descending() {
        let scheduler = family();
        let cutoff = Utc.with_ymd_and_hms(2020, 1, 3, 0, 0, 0).unwrap();
        let priorities: Vec<f64> = scheduler
            .prioritize(cutoff)
            .iter()
            .map(|g| g.priority())
            .collect();
        assert_eq!(priorities, vec![3.0, 2.5, 2.0]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let clock = ManualClock::shared(t0());
        let mut scheduler = Scheduler::new();
        for name in ["first", "second", "third"] {
            scheduler.add_goal(
                Goal::builder(name, Duration::hours(1))
                    .priority(1.0)
                    .clock(clock.clone())
                    .build()
                    .unwrap(),
            );
        }
        let names: Vec<&str> = scheduler
            .prioritize(t0() + Duration::days(1))
            .iter()
            .map(|g| g.name())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn due_is_strictly_before() {
        let scheduler = family();
        assert!(scheduler.due_at(t0() + Duration::days(1)).is_empty());
        assert_eq!(scheduler.due_at(t0() + Duration::days(1) + Duration::seconds(1)).len(), 3);
    }

    #[test]
    fn active_goals_are_never_due() {
        let clock = ManualClock::shared(t0());
        let mut goal = Goal::builder("goal", Duration::hours(1))
            .clock(clock.clone())
            .build()
            .unwrap();
        clock.advance(Duration::hours(2));
        goal.act().unwrap();

        let mut scheduler = Scheduler::new();
        scheduler.add_goal(goal);
        assert!(scheduler.due_at(t0() + Duration::days(365)).is_empty());
    }

    #[test]
    fn datetime_range_overshoots_like_a_stepper() {
        let range = Scheduler::datetime_range(t0(), Duration::hours(25), Duration::hours(10)).unwrap();
        assert_eq!(
            range,
            vec![
                t0(),
                t0() + Duration::hours(10),
                t0() + Duration::hours(20),
                t0() + Duration::hours(30),
            ]
        );

        let week = Scheduler::datetime_range(t0(), Duration::weeks(1), Duration::days(1)).unwrap();
        assert_eq!(week.len(), 8);
        assert_eq!(week.last(), Some(&(t0() + Duration::weeks(1))));
    }

    #[test]
    fn datetime_range_rejects_non_positive_step() {
        for step in [Duration::zero(), Duration::seconds(-1)] {
            assert!(matches!(
                Scheduler::datetime_range(t0(), Duration::days(1), step),
                Err(ValidationError::NonPositiveStep { .. })
            ));
        }
    }

    #[test]
    fn datetime_range_caps_slot_count() {
        let err = Scheduler::datetime_range(t0(), Duration::days(365_000), Duration::seconds(1))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "horizon"));

        let just_under = Duration::seconds(MAX_PLAN_SLOTS - 1);
        let range = Scheduler::datetime_range(t0(), just_under, Duration::seconds(1)).unwrap();
        assert_eq!(range.len() as i64, MAX_PLAN_SLOTS);
    }

    #[test]
    fn plan_lists_due_goals_per_slot() {
        let scheduler = family();
        let plan = scheduler
            .plan(t0(), Duration::days(2), Duration::days(1))
            .unwrap();
        assert_eq!(plan.len(), 3);
        assert!(plan[0].goals.is_empty());
        assert!(plan[1].goals.is_empty());
        let names: Vec<&str> = plan[2].goals.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Call Mom", "Call Heather", "Call Dad"]);
    }

    #[test]
    fn plan_slot_display_matches_report_lines() {
        let slot = PlanSlot {
            at: t0(),
            goals: vec![
                PlannedGoal {
                    name: "Call Mom".into(),
                    priority: 3.0,
                    next_main_action: None,
                },
                PlannedGoal {
                    name: "Call Heather".into(),
                    priority: 2.5,
                    next_main_action: None,
                },
            ],
        };
        assert_eq!(
            slot.to_string(),
            "2020-01-01 00:00\n  Call Mom: 3\n  Call Heather: 2.5\n"
        );
    }
}
