//! The per-agent cycle: snapshot, transition, ordered execution.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use ak_component::{CycleInfo, Observation, StepContext, StepOutput};
use ak_control::{ComponentStateController, StateChangeRequest, StateTransition};
use ak_core::{ActivationPolicy, AgentId, ChannelId, ComponentId, StochasticsService, Tick};
use ak_schedule::{ExecutionOrder, Link, ScheduleResult, TaskNode};
use thiserror::Error;
use tracing::{error, trace};

use crate::{ChannelStore, ComponentStore};

// ── Results ───────────────────────────────────────────────────────────────────

/// A component step that returned an error or panicked.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("component {component:?} of agent {agent} failed at {tick}: {reason}")]
pub struct ComponentFailure {
    pub agent:     AgentId,
    pub component: String,
    pub tick:      Tick,
    pub reason:    String,
    pub panicked:  bool,
}

/// What happened to one agent in one cycle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CycleResult {
    pub tick:         Tick,
    /// Components stepped successfully, in execution order.
    pub executed:     Vec<ComponentId>,
    /// Components not stepped because they were inactive or not due.
    pub skipped:      Vec<ComponentId>,
    pub transitions:  Vec<StateTransition>,
    pub observations: Vec<Observation>,
    pub failure:      Option<ComponentFailure>,
}

impl CycleResult {
    pub fn empty(tick: Tick) -> Self {
        Self { tick, ..Self::default() }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }
}

// ── ComponentScheduler ────────────────────────────────────────────────────────

/// Fixed execution order plus the controller that gates each cycle.
#[derive(Clone, Debug)]
pub struct ComponentScheduler {
    order:         ExecutionOrder,
    controller:    ComponentStateController,
    activation:    ActivationPolicy,
    cycle_time_ms: u64,
}

/// The mutable parts of an agent a cycle works on.
pub struct CycleParts<'a> {
    pub agent:       AgentId,
    pub components:  &'a mut ComponentStore,
    pub channels:    &'a mut ChannelStore,
    pub stochastics: &'a mut StochasticsService,
    pub requests:    &'a [StateChangeRequest],
}

impl ComponentScheduler {
    /// Derive the dependency graph from `channels` and sort it.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::CyclicDependency`][ak_schedule::ConfigurationError]
    /// if the wiring has a cycle.
    pub fn build(
        components:    &ComponentStore,
        channels:      &ChannelStore,
        controller:    ComponentStateController,
        activation:    ActivationPolicy,
        cycle_time_ms: u64,
    ) -> ScheduleResult<Self> {
        let nodes: Vec<TaskNode> = components
            .iter()
            .map(|(_, slot)| TaskNode::new(slot.name(), slot.priority))
            .collect();

        let mut links: Vec<Link> = channels
            .iter()
            .flat_map(|(_, ch)| ch.consumers.iter().map(move |&c| Link::new(ch.producer, c)))
            .collect();
        links.sort_unstable();
        links.dedup();

        let order = ExecutionOrder::build(&nodes, &links)?;
        Ok(Self { order, controller, activation, cycle_time_ms })
    }

    pub fn order(&self) -> &ExecutionOrder {
        &self.order
    }

    pub fn controller(&self) -> &ComponentStateController {
        &self.controller
    }

    pub fn activation(&self) -> ActivationPolicy {
        self.activation
    }

    /// Run one cycle.
    ///
    /// Stops at the first failing component; components after it in the
    /// order are neither executed nor listed as skipped.
    pub fn run_cycle(&self, tick: Tick, parts: CycleParts<'_>) -> CycleResult {
        let CycleParts { agent, components, channels, stochastics, requests } = parts;
        let mut result = CycleResult::empty(tick);

        // 1. Snapshot.  2. Transitions read only the snapshot.
        let mapping = components.snapshot();
        result.transitions = self.controller.apply(&mapping, requests, components.controls_mut());

        // 3. Ordered execution.
        let time_ms = tick.0 * self.cycle_time_ms;
        let cycle = CycleInfo { tick, time_ms, agent };

        for id in self.order.iter() {
            let Some(slot) = components.get_mut(id) else {
                continue;
            };
            if !self.activation.is_active(slot.control.state) || !slot.timing.is_due(time_ms) {
                result.skipped.push(id);
                continue;
            }

            let values = channels.read(&slot.inputs);
            let ctx = StepContext::new(cycle, &slot.control.name, slot.control.state, &mapping, &mut *stochastics)
                .with_ports(&slot.input_ports, &values, &slot.output_ports);
            let model = &mut slot.model;

            let outcome = catch_unwind(AssertUnwindSafe(move || {
                let mut ctx = ctx;
                model.step(&mut ctx).map(|()| ctx.finish())
            }));

            let failure = match outcome {
                Ok(Ok(output)) => match commit(channels, &slot.outputs, output, tick) {
                    Ok(observations) => {
                        trace!(agent = %agent, component = %slot.control.name, %tick, "stepped");
                        result.observations.extend(observations);
                        result.executed.push(id);
                        None
                    }
                    Err(reason) => Some((reason, false)),
                },
                Ok(Err(e)) => Some((e.to_string(), false)),
                Err(payload) => Some((panic_message(payload.as_ref()), true)),
            };

            if let Some((reason, panicked)) = failure {
                error!(agent = %agent, component = %slot.control.name, %tick, panicked, "{reason}");
                result.failure = Some(ComponentFailure {
                    agent,
                    component: slot.control.name.clone(),
                    tick,
                    reason,
                    panicked,
                });
                break;
            }
        }

        result
    }
}

/// Write staged outputs to their channels.  Every value is checked before
/// any channel changes, so a bad write leaves all channels as they were.
fn commit(
    channels: &mut ChannelStore,
    outputs:  &[ChannelId],
    output:   StepOutput,
    tick:     Tick,
) -> Result<Vec<Observation>, String> {
    let StepOutput { writes, observations } = output;
    for (port, value) in writes.iter().enumerate() {
        let (Some(value), Some(&id)) = (value, outputs.get(port)) else {
            continue;
        };
        match channels.get(id) {
            Some(ch) if ch.kind == value.kind() => {}
            Some(ch) => {
                return Err(format!("channel {:?} carries {}, got {}", ch.id, ch.kind, value.kind()));
            }
            None => return Err(format!("output port {port} is not bound to a channel")),
        }
    }
    for (port, value) in writes.into_iter().enumerate() {
        if let (Some(value), Some(&id)) = (value, outputs.get(port)) {
            if let Some(ch) = channels.get_mut(id) {
                ch.write(value, tick).map_err(|e| e.to_string())?;
            }
        }
    }
    Ok(observations)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_owned()
    }
}
