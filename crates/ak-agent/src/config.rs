//! Agent wiring configuration and its JSON loader.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "transitions": { "fallback": { "on_fulfilled": "Acting", "on_unfulfilled": "Disabled" } },
//!   "agents": [{
//!     "name": "ego",
//!     "components": [
//!       { "name": "sensor", "model": "noop", "outputs": ["c1"] },
//!       { "name": "ecu", "model": "ecu", "priority": 10,
//!         "inputs": ["collision", "p1", "p2", "p3"], "outputs": ["index"],
//!         "condition": { "equals": [{ "component": "sensor" }, { "fixed": "Acting" }] } }
//!     ],
//!     "channels": [
//!       { "id": "c1", "kind": "bool", "producer": "sensor", "consumers": ["ecu"] }
//!     ]
//!   }]
//! }
//! ```
//!
//! Omitted component fields default to: `type` `Undefined`, `model` `noop`,
//! `initial_state` `Acting`, no ports, no condition, priority 0, every cycle.

use std::io::Read;
use std::path::Path;

use ak_component::{ParameterValue, Parameters, SignalKind};
use ak_control::{Condition, TransitionTable};
use ak_core::{ComponentState, ComponentType};
use ak_schedule::TaskTiming;
use serde::{Deserialize, Serialize};

use crate::{AgentError, AgentResult};

// ── SystemConfig ──────────────────────────────────────────────────────────────

/// Every agent of a run plus the transition policies they share.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub transitions: TransitionTable,
    pub agents:      Vec<AgentConfig>,
}

// ── AgentConfig ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name:       String,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
    #[serde(default)]
    pub channels:   Vec<ChannelConfig>,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    pub fn component(mut self, component: ComponentConfig) -> Self {
        self.components.push(component);
        self
    }

    pub fn channel(mut self, channel: ChannelConfig) -> Self {
        self.channels.push(channel);
        self
    }
}

// ── ComponentConfig ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub name: String,

    #[serde(default, rename = "type")]
    pub component_type: ComponentType,

    /// Registry key of the model implementing this component.
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_initial_state")]
    pub initial_state: ComponentState,

    /// Input channel ids, in port order.
    #[serde(default)]
    pub inputs: Vec<String>,

    /// Output channel ids, in port order.
    #[serde(default)]
    pub outputs: Vec<String>,

    #[serde(default)]
    pub condition: Option<Condition>,

    /// Higher runs earlier among components whose inputs are ready.
    #[serde(default)]
    pub priority: i32,

    /// 0 = every cycle from `offset_ms` on.
    #[serde(default)]
    pub cycle_time_ms: u64,

    #[serde(default)]
    pub offset_ms: u64,

    #[serde(default)]
    pub parameters: Parameters,
}

fn default_model() -> String {
    "noop".to_owned()
}

fn default_initial_state() -> ComponentState {
    ComponentState::Acting
}

impl ComponentConfig {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name:           name.into(),
            component_type: ComponentType::Undefined,
            model:          model.into(),
            initial_state:  default_initial_state(),
            inputs:         Vec::new(),
            outputs:        Vec::new(),
            condition:      None,
            priority:       0,
            cycle_time_ms:  0,
            offset_ms:      0,
            parameters:     Parameters::default(),
        }
    }

    pub fn of_type(mut self, component_type: ComponentType) -> Self {
        self.component_type = component_type;
        self
    }

    pub fn initial_state(mut self, state: ComponentState) -> Self {
        self.initial_state = state;
        self
    }

    pub fn inputs<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inputs = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn outputs<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn timing(mut self, cycle_time_ms: u64, offset_ms: u64) -> Self {
        self.cycle_time_ms = cycle_time_ms;
        self.offset_ms = offset_ms;
        self
    }

    pub fn parameter(mut self, name: impl Into<String>, value: ParameterValue) -> Self {
        self.parameters.insert(name, value);
        self
    }

    pub fn task_timing(&self) -> TaskTiming {
        TaskTiming::new(self.cycle_time_ms, self.offset_ms)
    }
}

// ── ChannelConfig ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub id:        String,
    pub kind:      SignalKind,
    /// Name of the single component writing this channel.
    pub producer:  String,
    #[serde(default)]
    pub consumers: Vec<String>,
}

impl ChannelConfig {
    pub fn new<I, S>(id: impl Into<String>, kind: SignalKind, producer: impl Into<String>, consumers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id:        id.into(),
            kind,
            producer:  producer.into(),
            consumers: consumers.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Load a [`SystemConfig`] from a JSON file.
pub fn load_system_json(path: &Path) -> AgentResult<SystemConfig> {
    let file = std::fs::File::open(path).map_err(AgentError::Io)?;
    load_system_reader(std::io::BufReader::new(file))
}

/// Like [`load_system_json`] but accepts any `Read` source.
pub fn load_system_reader<R: Read>(reader: R) -> AgentResult<SystemConfig> {
    serde_json::from_reader(reader).map_err(|e| AgentError::Parse(e.to_string()))
}
