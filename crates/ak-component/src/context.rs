//! Per-step view handed to [`ComponentModel::step`][crate::ComponentModel::step].

use ak_control::StateMapping;
use ak_core::{AgentId, ComponentState, StochasticsInterface, Tick};

use crate::{Port, SignalValue, StepError, StepResult};

/// Where in the run a step happens.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CycleInfo {
    pub tick:    Tick,
    pub time_ms: u64,
    pub agent:   AgentId,
}

/// A value a component published for the observation sink.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Observation {
    pub time_ms: u64,
    pub agent:   AgentId,
    pub group:   String,
    pub key:     String,
    pub value:   SignalValue,
}

/// What a successful step produced, handed back to the scheduler.
#[derive(Debug, Default)]
pub struct StepOutput {
    /// One slot per output port; `None` leaves that channel untouched.
    pub writes:       Vec<Option<SignalValue>>,
    pub observations: Vec<Observation>,
}

/// Everything a component may see or do during one step.
///
/// Inputs are copies taken for this step only.  Outputs written here are
/// staged; the scheduler commits them after `step` returns `Ok`.
///
/// # Lifetimes
///
/// All borrows live for one step.  The scheduler holds the agent's
/// stochastics service and the cycle's state snapshot for exactly that long.
pub struct StepContext<'a> {
    pub cycle:       CycleInfo,
    /// Name of the component being stepped.
    pub component:   &'a str,
    /// Its state after this cycle's transitions.
    pub state:       ComponentState,
    /// The snapshot taken at the start of this cycle.
    pub states:      &'a StateMapping,
    pub stochastics: &'a mut dyn StochasticsInterface,

    input_ports:  &'a [Port],
    input_values: &'a [Option<SignalValue>],
    output_ports: &'a [Port],
    output:       StepOutput,
}

impl<'a> StepContext<'a> {
    pub fn new(
        cycle:       CycleInfo,
        component:   &'a str,
        state:       ComponentState,
        states:      &'a StateMapping,
        stochastics: &'a mut dyn StochasticsInterface,
    ) -> Self {
        Self {
            cycle,
            component,
            state,
            states,
            stochastics,
            input_ports:  &[],
            input_values: &[],
            output_ports: &[],
            output:       StepOutput::default(),
        }
    }

    /// Attach the port declarations and copied input values.
    ///
    /// `input_values[i]` is the current value of `input_ports[i]`'s channel,
    /// `None` if that channel was never written.
    pub fn with_ports(
        mut self,
        input_ports:  &'a [Port],
        input_values: &'a [Option<SignalValue>],
        output_ports: &'a [Port],
    ) -> Self {
        self.input_ports = input_ports;
        self.input_values = input_values;
        self.output_ports = output_ports;
        self.output.writes = vec![None; output_ports.len()];
        self
    }

    pub fn input_count(&self) -> usize {
        self.input_ports.len()
    }

    pub fn output_count(&self) -> usize {
        self.output_ports.len()
    }

    /// Current value of input `port`; `None` if unwritten or out of range.
    #[inline]
    pub fn input(&self, port: usize) -> Option<&SignalValue> {
        self.input_values.get(port).and_then(Option::as_ref)
    }

    /// Input `port` as a `bool`.  An unwritten channel reads as `None`.
    pub fn read_bool(&self, port: usize) -> StepResult<Option<bool>> {
        match self.input(port) {
            None => Ok(None),
            Some(SignalValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.input_mismatch(port, other)),
        }
    }

    /// Input `port` as an `f64`.  An unwritten channel reads as `None`.
    pub fn read_double(&self, port: usize) -> StepResult<Option<f64>> {
        match self.input(port) {
            None => Ok(None),
            Some(SignalValue::Double(d)) => Ok(Some(*d)),
            Some(other) => Err(self.input_mismatch(port, other)),
        }
    }

    /// Stage `value` for output `port`.  Writing a port twice keeps the last
    /// value.
    pub fn write(&mut self, port: usize, value: impl Into<SignalValue>) -> StepResult<()> {
        let value = value.into();
        let Some(spec) = self.output_ports.get(port) else {
            return Err(StepError::UnknownOutput { port });
        };
        if value.kind() != spec.kind {
            return Err(StepError::KindMismatch {
                channel:  spec.channel.clone(),
                expected: spec.kind,
                found:    value.kind(),
            });
        }
        self.output.writes[port] = Some(value);
        Ok(())
    }

    /// Publish a value for the observation sink under `group`/`key`.
    pub fn publish(&mut self, group: impl Into<String>, key: impl Into<String>, value: impl Into<SignalValue>) {
        self.output.observations.push(Observation {
            time_ms: self.cycle.time_ms,
            agent:   self.cycle.agent,
            group:   group.into(),
            key:     key.into(),
            value:   value.into(),
        });
    }

    /// Consume the context, yielding staged writes and observations.
    pub fn finish(self) -> StepOutput {
        self.output
    }

    fn input_mismatch(&self, port: usize, found: &SignalValue) -> StepError {
        let (channel, expected) = self
            .input_ports
            .get(port)
            .map_or((String::new(), found.kind()), |p| (p.channel.clone(), p.kind));
        StepError::KindMismatch { channel, expected, found: found.kind() }
    }
}
