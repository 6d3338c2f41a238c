//! Simulation time model.
//!
//! # Design
//!
//! Time advances in fixed cycles.  A `Tick` counts cycles since the start of
//! the run; the mapping to simulated milliseconds lives in `SimClock`:
//!
//!   time_ms = tick * cycle_time_ms
//!
//! Using an integer tick as the canonical unit keeps component timing
//! arithmetic (cycle times, offsets) exact.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation cycle counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick immediately following `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between cycle counts and simulated milliseconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated milliseconds per cycle.
    pub cycle_time_ms: u64,
    /// The current tick, advanced by [`SimClock::advance`] after each cycle.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(cycle_time_ms: u64) -> Self {
        Self { cycle_time_ms, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one cycle.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick.next();
    }

    /// Simulated time of `tick` in milliseconds.
    #[inline]
    pub fn time_ms(&self, tick: Tick) -> u64 {
        tick.0 * self.cycle_time_ms
    }

    /// Simulated time of the current tick in milliseconds.
    #[inline]
    pub fn current_time_ms(&self) -> u64 {
        self.time_ms(self.current_tick)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ms)", self.current_tick, self.current_time_ms())
    }
}

// ── FailurePolicy ─────────────────────────────────────────────────────────────

/// What a run does when a component step fails.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FailurePolicy {
    /// Exclude the failed agent from further cycles; other agents continue.
    #[default]
    IsolateAgent,
    /// Stop the whole run on the first failure.
    AbortOnAny,
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the run builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated milliseconds per cycle.  Component cycle times and offsets
    /// are expressed in the same unit.
    pub cycle_time_ms: u64,

    /// Total cycles to simulate.
    pub total_cycles: u64,

    /// Master seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker thread count for the `parallel` feature.  `None` uses all
    /// logical cores.
    pub num_threads: Option<usize>,

    /// How component failures affect the run.
    pub failure_policy: FailurePolicy,

    /// Which component states execute.
    pub activation: crate::ActivationPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cycle_time_ms:  100,
            total_cycles:   0,
            seed:           0,
            num_threads:    None,
            failure_policy: FailurePolicy::IsolateAgent,
            activation:     crate::ActivationPolicy::ActingOnly,
        }
    }
}

impl SimConfig {
    /// The tick at which the run ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_cycles)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.cycle_time_ms)
    }
}
