//! Fluent builder for constructing a [`Run`].

use std::collections::BTreeSet;

use ak_agent::{AgentModel, ComponentRegistry, SystemConfig};
use ak_core::{AgentId, SimConfig};
use tracing::info;

use crate::{CancelFlag, Run, SimError, SimResult};

/// Fluent builder for [`Run`].
///
/// # Required inputs
///
/// - [`SimConfig`] — cycle time, cycle count, seed, failure policy, …
/// - [`ComponentRegistry`] — the models agent configurations may name
///
/// # Optional inputs
///
/// | Method              | Default                       |
/// |---------------------|-------------------------------|
/// | `.system(s)`        | No agents                     |
/// | `.cancel_flag(f)`   | A fresh, unset `CancelFlag`   |
///
/// Every configuration error surfaces from [`build`][Self::build]; a run
/// that builds never fails on configuration later.
pub struct RunBuilder {
    config:   SimConfig,
    registry: ComponentRegistry,
    system:   SystemConfig,
    cancel:   Option<CancelFlag>,
}

impl RunBuilder {
    pub fn new(config: SimConfig, registry: ComponentRegistry) -> Self {
        Self { config, registry, system: SystemConfig::default(), cancel: None }
    }

    /// Agents and transition policies to run.
    pub fn system(mut self, system: SystemConfig) -> Self {
        self.system = system;
        self
    }

    /// Share an existing cancel flag with the run.
    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Validate the configuration and build every agent.
    pub fn build(self) -> SimResult<Run> {
        if self.config.cycle_time_ms == 0 {
            return Err(SimError::Config("cycle_time_ms must be positive".into()));
        }
        if self.config.num_threads == Some(0) {
            return Err(SimError::Config("num_threads must be positive".into()));
        }

        let mut names = BTreeSet::new();
        for agent in &self.system.agents {
            if !names.insert(agent.name.as_str()) {
                return Err(SimError::Config(format!("agent {:?} declared more than once", agent.name)));
            }
        }

        let agents = self
            .system
            .agents
            .iter()
            .enumerate()
            .map(|(i, agent)| {
                AgentModel::from_config(
                    AgentId::from_index(i),
                    agent,
                    &self.system.transitions,
                    &self.registry,
                    &self.config,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(feature = "parallel")]
        let pool = self
            .config
            .num_threads
            .map(|n| rayon::ThreadPoolBuilder::new().num_threads(n).build())
            .transpose()
            .map_err(|e| SimError::ThreadPool(e.to_string()))?;

        info!(
            agents = agents.len(),
            cycles = self.config.total_cycles,
            cycle_time_ms = self.config.cycle_time_ms,
            seed = self.config.seed,
            "run built"
        );

        Ok(Run::new(
            self.config,
            agents,
            self.cancel.unwrap_or_default(),
            #[cfg(feature = "parallel")]
            pool,
        ))
    }
}
