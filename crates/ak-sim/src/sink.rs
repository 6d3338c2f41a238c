//! The observation sink the run reports to.

use ak_agent::ComponentFailure;
use ak_component::SignalValue;
use ak_control::StateTransition;
use ak_core::{AgentId, Tick};

use crate::RunResult;

/// A discrete event worth recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    StateChange {
        tick:       Tick,
        time_ms:    u64,
        agent:      AgentId,
        transition: StateTransition,
    },
    ComponentFailure {
        time_ms: u64,
        failure: ComponentFailure,
    },
    /// The run stopped before `tick` because its cancel flag was set.
    Cancelled { tick: Tick },
}

/// Callbacks invoked by [`Run`][crate::Run] at fixed points of the loop.
///
/// Sink implementations (files, databases, live plots) live outside the
/// kernel.  All methods have no-op defaults so implementors only override
/// what they need.
///
/// # Example — failure printer
///
/// ```rust,ignore
/// struct FailurePrinter;
///
/// impl ObservationSink for FailurePrinter {
///     fn insert_event(&mut self, event: &RunEvent) {
///         if let RunEvent::ComponentFailure { failure, .. } = event {
///             eprintln!("{failure}");
///         }
///     }
/// }
/// ```
pub trait ObservationSink {
    /// Once, before the first cycle.
    fn pre_run(&mut self) {}

    /// After every cycle, with the run's result so far.
    fn update(&mut self, _cycle: u64, _interim: &RunResult) {}

    /// Once, after the last cycle.
    fn post_run(&mut self, _result: &RunResult) {}

    fn insert_event(&mut self, _event: &RunEvent) {}

    /// A value a component published.
    fn insert(&mut self, _time_ms: u64, _agent: AgentId, _group: &str, _key: &str, _value: &SignalValue) {}
}

/// An [`ObservationSink`] that records nothing.
pub struct NoopSink;

impl ObservationSink for NoopSink {}
