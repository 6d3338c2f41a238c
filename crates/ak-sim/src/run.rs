//! The `Run` struct and its cycle loop.

use ak_agent::{AgentModel, CycleResult};
use ak_core::{AgentId, FailurePolicy, SimClock, SimConfig, Tick};
use tracing::{info, warn};

use crate::{AgentStatus, CancelFlag, ObservationSink, RunEvent, RunResult};

/// A built run: every agent plus the clock and the result so far.
///
/// Create via [`RunBuilder`][crate::RunBuilder].
pub struct Run {
    config:   SimConfig,
    clock:    SimClock,
    agents:   Vec<AgentModel>,
    cancel:   CancelFlag,
    result:   RunResult,
    started:  bool,
    stopped:  bool,
    #[cfg(feature = "parallel")]
    pool:     Option<rayon::ThreadPool>,
}

impl Run {
    pub(crate) fn new(
        config: SimConfig,
        agents: Vec<AgentModel>,
        cancel: CancelFlag,
        #[cfg(feature = "parallel")] pool: Option<rayon::ThreadPool>,
    ) -> Self {
        Self {
            clock: config.make_clock(),
            result: RunResult::new(agents.len()),
            config,
            agents,
            cancel,
            started: false,
            stopped: false,
            #[cfg(feature = "parallel")]
            pool,
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current cycle to `config.total_cycles`, then call
    /// `post_run`.
    pub fn run<S: ObservationSink>(&mut self, sink: &mut S) -> RunResult {
        self.start(sink);
        while !self.stopped && self.clock.current_tick < self.config.end_tick() {
            self.cycle(sink);
        }
        self.finish(sink)
    }

    /// Run at most `n` cycles from the current position, ignoring
    /// `total_cycles`.  Stops early on cancellation or abort.  Does not call
    /// `post_run`; use [`finish`][Self::finish] for that.
    pub fn run_cycles<S: ObservationSink>(&mut self, n: u64, sink: &mut S) -> &RunResult {
        self.start(sink);
        for _ in 0..n {
            if self.stopped {
                break;
            }
            self.cycle(sink);
        }
        &self.result
    }

    /// Call `post_run` with the final result and return it.
    pub fn finish<S: ObservationSink>(&mut self, sink: &mut S) -> RunResult {
        info!(
            cycles = self.result.cycles_completed,
            succeeded = self.result.succeeded,
            failed_agents = self.result.failed_agents().count(),
            "run finished"
        );
        sink.post_run(&self.result);
        self.result.clone()
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn result(&self) -> &RunResult {
        &self.result
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn agents(&self) -> &[AgentModel] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentModel> {
        self.agents.get(id.index())
    }

    /// Mutable access between cycles, e.g. to queue state-change requests.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentModel> {
        self.agents.get_mut(id.index())
    }

    // ── Cycle processing ──────────────────────────────────────────────────

    fn start<S: ObservationSink>(&mut self, sink: &mut S) {
        if !self.started {
            self.started = true;
            sink.pre_run();
        }
    }

    fn cycle<S: ObservationSink>(&mut self, sink: &mut S) {
        let tick = self.clock.current_tick;

        if self.cancel.is_cancelled() {
            warn!(%tick, "run cancelled");
            self.stopped = true;
            self.result.cancelled = true;
            self.result.succeeded = false;
            self.result.failure_reason = Some(format!("cancelled before {tick}"));
            sink.insert_event(&RunEvent::Cancelled { tick });
            return;
        }

        let results = self.step_agents(tick);

        // Barrier passed: every agent finished this cycle.
        let time_ms = self.clock.time_ms(tick);
        for (i, cycle) in results.into_iter().enumerate() {
            self.report(AgentId::from_index(i), time_ms, cycle, sink);
        }

        self.result.cycles_completed += 1;
        sink.update(tick.0, &self.result);
        self.clock.advance();
    }

    /// One cycle of every agent, results in agent order.  Failed agents
    /// return an empty result without doing anything.
    fn step_agents(&mut self, tick: Tick) -> Vec<CycleResult> {
        #[cfg(not(feature = "parallel"))]
        {
            self.agents.iter_mut().map(|agent| agent.run_cycle(tick)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let agents = &mut self.agents;
            let mut step = move || -> Vec<CycleResult> {
                agents.par_iter_mut().map(|agent| agent.run_cycle(tick)).collect()
            };
            match &self.pool {
                Some(pool) => pool.install(step),
                None => step(),
            }
        }
    }

    fn report<S: ObservationSink>(&mut self, agent: AgentId, time_ms: u64, cycle: CycleResult, sink: &mut S) {
        let CycleResult { tick, transitions, observations, failure, .. } = cycle;

        for transition in transitions {
            sink.insert_event(&RunEvent::StateChange { tick, time_ms, agent, transition });
        }
        for obs in &observations {
            sink.insert(obs.time_ms, obs.agent, &obs.group, &obs.key, &obs.value);
        }

        let Some(failure) = failure else {
            return;
        };
        sink.insert_event(&RunEvent::ComponentFailure { time_ms, failure: failure.clone() });

        if self.config.failure_policy == FailurePolicy::AbortOnAny && !self.stopped {
            warn!(%agent, %tick, "aborting run after component failure");
            self.stopped = true;
            self.result.succeeded = false;
            self.result.failure_reason = Some(failure.to_string());
        }
        if let Some(status) = self.result.agent_status.get_mut(agent.index()) {
            *status = AgentStatus::Failed(failure);
        }
    }
}
