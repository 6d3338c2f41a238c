//! When a component runs, independent of its state.

use crate::{ConfigurationError, ScheduleResult};

/// Cycle time and offset of one component, in simulated milliseconds.
///
/// A component with `cycle_time_ms == 0` runs every cycle from `offset_ms`
/// on.  Otherwise it runs at `offset_ms`, `offset_ms + cycle_time_ms`,
/// `offset_ms + 2·cycle_time_ms`, and so on.  Nothing runs before
/// `offset_ms`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TaskTiming {
    pub cycle_time_ms: u64,
    pub offset_ms:     u64,
}

impl TaskTiming {
    /// Runs every cycle.
    pub const EVERY_CYCLE: TaskTiming = TaskTiming { cycle_time_ms: 0, offset_ms: 0 };

    pub fn new(cycle_time_ms: u64, offset_ms: u64) -> Self {
        Self { cycle_time_ms, offset_ms }
    }

    #[inline]
    pub fn is_due(&self, time_ms: u64) -> bool {
        if time_ms < self.offset_ms {
            return false;
        }
        self.cycle_time_ms == 0 || (time_ms - self.offset_ms) % self.cycle_time_ms == 0
    }

    /// Both values must be whole multiples of the run's cycle time.
    pub fn validate(&self, component: &str, run_cycle_ms: u64) -> ScheduleResult<()> {
        if run_cycle_ms == 0 {
            return Err(invalid(component, "run cycle time is zero".to_owned()));
        }
        if self.cycle_time_ms % run_cycle_ms != 0 {
            return Err(invalid(
                component,
                format!("cycle time {} ms is not a multiple of {run_cycle_ms} ms", self.cycle_time_ms),
            ));
        }
        if self.offset_ms % run_cycle_ms != 0 {
            return Err(invalid(
                component,
                format!("offset {} ms is not a multiple of {run_cycle_ms} ms", self.offset_ms),
            ));
        }
        Ok(())
    }
}

fn invalid(component: &str, reason: String) -> ConfigurationError {
    ConfigurationError::InvalidTiming { component: component.to_owned(), reason }
}
