//! `AgentModel` — one agent, assembled from configuration.

use std::mem;

use ak_component::{ModelInit, Port, SignalValue};
use ak_control::{ComponentStateController, ControlState, StateChangeRequest, TransitionTable};
use ak_core::{AgentId, ChannelId, ComponentId, ComponentState, SimConfig, StochasticsService, Tick};
use ak_schedule::{ConfigurationError, ScheduleResult};
use tracing::{debug, info};

use crate::{
    AgentConfig, AgentError, AgentResult, ChannelStore, ComponentFailure, ComponentRegistry,
    ComponentScheduler, ComponentSlot, ComponentStore, CycleParts, CycleResult, SignalChannel,
    wiring,
};

/// One simulated agent: its components, channels, scheduler, and generator.
///
/// Agents share nothing with each other, so a run may step them on different
/// threads.  Within an agent everything is sequential.
pub struct AgentModel {
    id:          AgentId,
    name:        String,
    components:  ComponentStore,
    channels:    ChannelStore,
    scheduler:   ComponentScheduler,
    stochastics: StochasticsService,
    pending:     Vec<StateChangeRequest>,
    failure:     Option<ComponentFailure>,
}

impl AgentModel {
    /// Validate `config`, build every component model, and sort the graph.
    ///
    /// # Errors
    ///
    /// [`AgentError::Configuration`] for any structural defect: duplicate
    /// names, dangling references, inconsistent or multi-writer channels,
    /// unknown models, invalid timing, or a dependency cycle.
    pub fn from_config(
        id:          AgentId,
        config:      &AgentConfig,
        transitions: &TransitionTable,
        registry:    &ComponentRegistry,
        sim:         &SimConfig,
    ) -> AgentResult<Self> {
        let err = |e| AgentError::configuration(&config.name, e);

        wiring::check(config).map_err(err)?;
        let (components, channels) = assemble(config, registry, sim).map_err(err)?;
        let scheduler = ComponentScheduler::build(
            &components,
            &channels,
            ComponentStateController::new(transitions.clone()),
            sim.activation,
            sim.cycle_time_ms,
        )
        .map_err(err)?;

        info!(
            agent = %id,
            name = %config.name,
            components = components.len(),
            channels = channels.len(),
            "agent built"
        );

        Ok(Self {
            id,
            name: config.name.clone(),
            components,
            channels,
            scheduler,
            stochastics: StochasticsService::for_agent(sim.seed, id),
            pending: Vec::new(),
            failure: None,
        })
    }

    /// Run one cycle.  A failed agent does nothing and returns an empty
    /// result.
    pub fn run_cycle(&mut self, tick: Tick) -> CycleResult {
        if self.failure.is_some() {
            return CycleResult::empty(tick);
        }

        let requests = mem::take(&mut self.pending);
        let result = self.scheduler.run_cycle(tick, CycleParts {
            agent:       self.id,
            components:  &mut self.components,
            channels:    &mut self.channels,
            stochastics: &mut self.stochastics,
            requests:    &requests,
        });

        if let Some(failure) = &result.failure {
            self.failure = Some(failure.clone());
        }
        debug!(
            agent = %self.id,
            %tick,
            executed = result.executed.len(),
            skipped = result.skipped.len(),
            transitions = result.transitions.len(),
            "cycle done"
        );
        result
    }

    /// Queue a state change applied at the start of the next cycle, ahead of
    /// the component's condition.  Dropped once the agent has failed.
    pub fn request_state_change(&mut self, component: impl Into<String>, state: ComponentState) {
        let component = component.into();
        if self.failure.is_some() {
            debug!(agent = %self.id, %component, %state, "agent failed, state change dropped");
            return;
        }
        self.pending.push(StateChangeRequest::new(component, state));
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure(&self) -> Option<&ComponentFailure> {
        self.failure.as_ref()
    }

    pub fn component_state(&self, name: &str) -> Option<ComponentState> {
        self.components.by_name(name).map(|slot| slot.control.state)
    }

    pub fn component_name(&self, id: ComponentId) -> Option<&str> {
        self.components.get(id).map(ComponentSlot::name)
    }

    /// Current value of channel `id`.
    pub fn channel_value(&self, id: &str) -> Option<&SignalValue> {
        self.channels.value_of(id)
    }

    pub fn channel_written_at(&self, id: &str) -> Option<Tick> {
        self.channels
            .id_of(id)
            .and_then(|c| self.channels.get(c))
            .and_then(SignalChannel::written_at)
    }

    /// Component names in execution order.
    pub fn execution_order(&self) -> Vec<&str> {
        self.scheduler
            .order()
            .iter()
            .filter_map(|id| self.component_name(id))
            .collect()
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub fn channels(&self) -> &ChannelStore {
        &self.channels
    }
}

// ── Assembly ──────────────────────────────────────────────────────────────────

/// Build both arenas.  Assumes `wiring::check` passed.
fn assemble(
    config:   &AgentConfig,
    registry: &ComponentRegistry,
    sim:      &SimConfig,
) -> ScheduleResult<(ComponentStore, ChannelStore)> {
    // Channel producers/consumers need component ids, which are declaration
    // positions.
    let component_id = |name: &str, referenced_by: &str| {
        config
            .components
            .iter()
            .position(|c| c.name == name)
            .map(ComponentId::from_index)
            .ok_or_else(|| ConfigurationError::UnknownComponent {
                name:          name.to_owned(),
                referenced_by: referenced_by.to_owned(),
            })
    };

    let mut channels = ChannelStore::new();
    for ch in &config.channels {
        let producer = component_id(&ch.producer, &ch.id)?;
        let consumers = ch
            .consumers
            .iter()
            .map(|name| component_id(name, &ch.id))
            .collect::<ScheduleResult<Vec<_>>>()?;
        channels.push(SignalChannel::new(ch.id.clone(), ch.kind, producer, consumers));
    }

    let resolve = |ids: &[String], component: &str| -> ScheduleResult<(Vec<ChannelId>, Vec<Port>)> {
        ids.iter()
            .map(|id| {
                let cid = channels.id_of(id).ok_or_else(|| ConfigurationError::UnknownChannel {
                    channel:   id.clone(),
                    component: component.to_owned(),
                })?;
                let port = channels.get(cid).map(SignalChannel::port).ok_or_else(|| {
                    ConfigurationError::UnknownChannel { channel: id.clone(), component: component.to_owned() }
                })?;
                Ok((cid, port))
            })
            .collect::<ScheduleResult<Vec<_>>>()
            .map(|pairs| pairs.into_iter().unzip())
    };

    let mut components = ComponentStore::new();
    for c in &config.components {
        let timing = c.task_timing();
        timing.validate(&c.name, sim.cycle_time_ms)?;

        let (inputs, input_ports) = resolve(&c.inputs, &c.name)?;
        let (outputs, output_ports) = resolve(&c.outputs, &c.name)?;

        let model = registry.create(&c.model, &ModelInit {
            component:  &c.name,
            priority:   c.priority,
            inputs:     &input_ports,
            outputs:    &output_ports,
            parameters: &c.parameters,
        })?;

        let mut control = ControlState::new(c.name.clone(), c.component_type, c.initial_state);
        if let Some(condition) = &c.condition {
            let missing: Vec<&str> = condition
                .referenced_components()
                .into_iter()
                .filter(|name| !config.components.iter().any(|other| other.name == *name))
                .collect();
            if !missing.is_empty() {
                debug!(component = %c.name, ?missing, "condition watches components outside this agent");
            }
            control = control.with_condition(condition.clone());
        }

        components.push(ComponentSlot {
            control,
            priority: c.priority,
            timing,
            inputs,
            outputs,
            input_ports,
            output_ports,
            model,
        });
    }

    Ok((components, channels))
}
