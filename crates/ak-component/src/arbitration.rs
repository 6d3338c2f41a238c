//! Priority arbitration with hysteresis.
//!
//! Several boolean triggers, ordered from highest to lowest priority, are
//! reduced to one outcome per call:
//!
//! | Triggers                         | Outcome                     | Prior-activity flag |
//! |----------------------------------|-----------------------------|---------------------|
//! | trigger 0 set                    | `outcomes[0]`               | unchanged           |
//! | first set trigger is `i > 0`     | `outcomes[i]`               | set                 |
//! | none set, flag clear             | `idle`                      | clear               |
//! | none set, flag set               | `post_activity`             | set                 |
//!
//! Trigger 0 has absolute priority; lower triggers are ignored while it is
//! set.  The flag is never cleared.  It lives as long as the pattern
//! instance, so a rebuilt agent starts idle again.

use crate::ArbitrationError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArbitrationPattern {
    outcomes:           Vec<i32>,
    idle:               i32,
    post_activity:      i32,
    had_prior_activity: bool,
}

impl ArbitrationPattern {
    /// `outcomes[i]` is reported when trigger `i` is the highest one set.
    pub fn new(outcomes: Vec<i32>, idle: i32, post_activity: i32) -> Result<Self, ArbitrationError> {
        if outcomes.is_empty() {
            return Err(ArbitrationError::NoOutcomes);
        }
        Ok(Self { outcomes, idle, post_activity, had_prior_activity: false })
    }

    /// The ECU layout: collision → 0, priority 1..3 → 1..3, idle −1,
    /// post-activity 100.
    pub fn ecu() -> Self {
        Self {
            outcomes:           vec![0, 1, 2, 3],
            idle:               -1,
            post_activity:      100,
            had_prior_activity: false,
        }
    }

    /// Reduce `triggers` (highest priority first) to one outcome.
    pub fn decide(&mut self, triggers: &[bool]) -> Result<i32, ArbitrationError> {
        if triggers.len() != self.outcomes.len() {
            return Err(ArbitrationError::TriggerCount {
                expected: self.outcomes.len(),
                found:    triggers.len(),
            });
        }

        match triggers.iter().position(|&t| t) {
            Some(0) => Ok(self.outcomes[0]),
            Some(i) => {
                self.had_prior_activity = true;
                Ok(self.outcomes[i])
            }
            None if self.had_prior_activity => Ok(self.post_activity),
            None => Ok(self.idle),
        }
    }

    pub fn had_prior_activity(&self) -> bool {
        self.had_prior_activity
    }

    pub fn trigger_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn idle(&self) -> i32 {
        self.idle
    }

    pub fn post_activity(&self) -> i32 {
        self.post_activity
    }
}
