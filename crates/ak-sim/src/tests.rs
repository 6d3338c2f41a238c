//! Integration tests for ak-sim.

use ak_agent::{AgentConfig, ChannelConfig, ComponentConfig, ComponentRegistry, SystemConfig};
use ak_component::{ComponentModel, FnComponent, ParameterValue, SignalKind, SignalValue, StepError};
use ak_core::{AgentId, FailurePolicy, SimConfig, Tick};

use crate::{CancelFlag, ObservationSink, RunBuilder, RunEvent, RunResult};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn boxed(model: impl ComponentModel) -> Box<dyn ComponentModel> {
    Box::new(model)
}

/// Built-ins plus two test models.
fn registry() -> ComponentRegistry {
    ComponentRegistry::default()
        // Writes the tick to output 0 and publishes it as "counter"/"tick".
        .with("ticker", |_| {
            Ok(boxed(FnComponent::new(|ctx| {
                let t = ctx.cycle.tick.0 as i64;
                ctx.publish("counter", "tick", t);
                ctx.write(0, t)
            })))
        })
        // Fails from tick `at` on.
        .with("fail", |init| {
            let at = init.parameters.int(init.component, "at")?.unwrap_or(0) as u64;
            Ok(boxed(FnComponent::new(move |ctx| {
                if ctx.cycle.tick.0 >= at {
                    return Err(StepError::Failed("actuator stuck".into()));
                }
                Ok(())
            })))
        })
}

fn config(total_cycles: u64) -> SimConfig {
    SimConfig {
        cycle_time_ms: 100,
        total_cycles,
        seed: 7,
        num_threads: Some(1),
        ..SimConfig::default()
    }
}

fn ticking_agent(name: &str) -> AgentConfig {
    AgentConfig::new(name)
        .component(ComponentConfig::new("counter", "ticker").outputs(["t"]))
        .channel(ChannelConfig::new("t", SignalKind::Int, "counter", std::iter::empty::<&str>()))
}

fn failing_agent(name: &str, at: i64) -> AgentConfig {
    AgentConfig::new(name).component(ComponentConfig::new("brake", "fail").parameter("at", ParameterValue::Int(at)))
}

fn system(agents: impl IntoIterator<Item = AgentConfig>) -> SystemConfig {
    SystemConfig { agents: agents.into_iter().collect(), ..SystemConfig::default() }
}

/// Records every hook call as a line of text.
#[derive(Default)]
struct Recorder {
    log: Vec<String>,
}

impl Recorder {
    fn count(&self, prefix: &str) -> usize {
        self.log.iter().filter(|l| l.starts_with(prefix)).count()
    }
}

impl ObservationSink for Recorder {
    fn pre_run(&mut self) {
        self.log.push("pre_run".into());
    }

    fn update(&mut self, cycle: u64, interim: &RunResult) {
        self.log.push(format!("update {cycle} {}", interim.cycles_completed));
    }

    fn post_run(&mut self, result: &RunResult) {
        self.log.push(format!("post_run {}", result.succeeded));
    }

    fn insert_event(&mut self, event: &RunEvent) {
        let line = match event {
            RunEvent::StateChange { tick, agent, transition, .. } => {
                format!("state {agent} {tick} {} {}", transition.component, transition.to)
            }
            RunEvent::ComponentFailure { failure, .. } => {
                format!("failure {} {} {}", failure.agent, failure.component, failure.tick)
            }
            RunEvent::Cancelled { tick } => format!("cancelled {tick}"),
        };
        self.log.push(line);
    }

    fn insert(&mut self, time_ms: u64, agent: AgentId, group: &str, key: &str, value: &SignalValue) {
        self.log.push(format!("insert {time_ms} {agent} {group}/{key}={value}"));
    }
}

// ── RunBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::SimError;

    #[test]
    fn builds_every_agent() {
        let run = RunBuilder::new(config(5), registry())
            .system(system([ticking_agent("a"), ticking_agent("b")]))
            .build()
            .unwrap();
        assert_eq!(run.agents().len(), 2);
        assert_eq!(run.agent(AgentId(1)).unwrap().name(), "b");
        assert_eq!(run.result().agent_status.len(), 2);
    }

    #[test]
    fn zero_cycle_time_errors() {
        let cfg = SimConfig { cycle_time_ms: 0, ..config(5) };
        let result = RunBuilder::new(cfg, registry()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn duplicate_agent_names_error() {
        let result = RunBuilder::new(config(5), registry())
            .system(system([ticking_agent("a"), ticking_agent("a")]))
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn configuration_error_fails_before_any_cycle() {
        let broken = AgentConfig::new("b").component(ComponentConfig::new("x", "no-such-model"));
        let result = RunBuilder::new(config(5), registry())
            .system(system([ticking_agent("a"), broken]))
            .build();
        let Err(SimError::Agent(err)) = result else {
            panic!("expected an agent configuration error");
        };
        assert!(err.as_configuration().is_some());
    }
}

// ── Cycle loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn hooks_bracket_the_run() {
        let mut run = RunBuilder::new(config(3), registry())
            .system(system([ticking_agent("a")]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let result = run.run(&mut rec);

        assert!(result.succeeded);
        assert_eq!(result.cycles_completed, 3);
        assert_eq!(rec.log.first().map(String::as_str), Some("pre_run"));
        assert_eq!(rec.log.last().map(String::as_str), Some("post_run true"));
        assert_eq!(rec.count("pre_run"), 1);
        assert_eq!(rec.count("post_run"), 1);
        assert_eq!(rec.count("update"), 3);
        assert_eq!(run.clock().current_tick, Tick(3));
    }

    #[test]
    fn reports_in_agent_order_after_each_cycle() {
        let mut run = RunBuilder::new(config(2), registry())
            .system(system([ticking_agent("a"), ticking_agent("b")]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        run.run(&mut rec);

        assert_eq!(rec.log, vec![
            "pre_run",
            "insert 0 AgentId(0) counter/tick=0",
            "insert 0 AgentId(1) counter/tick=0",
            "update 0 1",
            "insert 100 AgentId(0) counter/tick=1",
            "insert 100 AgentId(1) counter/tick=1",
            "update 1 2",
            "post_run true",
        ]);
    }

    #[test]
    fn transitions_become_events() {
        let mut run = RunBuilder::new(config(2), registry())
            .system(system([ticking_agent("a")]))
            .build()
            .unwrap();
        run.agent_mut(AgentId(0))
            .unwrap()
            .request_state_change("counter", ak_core::ComponentState::Disabled);

        let mut rec = Recorder::default();
        run.run(&mut rec);

        assert_eq!(rec.count("state AgentId(0) T0 counter Disabled"), 1);
        // Disabled components do not publish.
        assert_eq!(rec.count("insert"), 0);
        assert_eq!(run.agents()[0].channel_value("t"), None);
    }

    #[test]
    fn run_cycles_steps_incrementally() {
        let mut run = RunBuilder::new(config(100), registry())
            .system(system([ticking_agent("a")]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();

        assert_eq!(run.run_cycles(2, &mut rec).cycles_completed, 2);
        assert_eq!(run.run_cycles(3, &mut rec).cycles_completed, 5);
        assert_eq!(rec.count("pre_run"), 1);
        assert_eq!(rec.count("post_run"), 0);
        assert_eq!(run.agents()[0].channel_value("t"), Some(&SignalValue::Int(4)));

        let result = run.finish(&mut rec);
        assert_eq!(result.cycles_completed, 5);
        assert_eq!(rec.count("post_run"), 1);
    }

    #[test]
    fn agents_with_the_same_seed_do_not_share_streams() {
        let noisy = ComponentRegistry::default().with("noise", |_| {
            Ok(boxed(FnComponent::new(|ctx| {
                let v = ctx.stochastics.uniform(0.0, 1.0)?;
                ctx.write(0, v)
            })))
        });
        let agent = |name: &str| {
            AgentConfig::new(name)
                .component(ComponentConfig::new("n", "noise").outputs(["v"]))
                .channel(ChannelConfig::new("v", SignalKind::Double, "n", std::iter::empty::<&str>()))
        };
        let mut run = RunBuilder::new(config(1), noisy)
            .system(system([agent("a"), agent("b")]))
            .build()
            .unwrap();
        run.run(&mut crate::NoopSink);

        let a = run.agents()[0].channel_value("v").cloned();
        let b = run.agents()[1].channel_value("v").cloned();
        assert!(a.is_some());
        assert_ne!(a, b);
    }
}

// ── Failure policy ────────────────────────────────────────────────────────────

#[cfg(test)]
mod failure_tests {
    use super::*;
    use crate::AgentStatus;

    #[test]
    fn isolation_keeps_other_agents_running() {
        let mut run = RunBuilder::new(config(4), registry())
            .system(system([failing_agent("bad", 1), ticking_agent("good")]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let result = run.run(&mut rec);

        assert!(result.succeeded);
        assert_eq!(result.cycles_completed, 4);
        assert_eq!(result.failed_agents().collect::<Vec<_>>(), vec![AgentId(0)]);
        assert!(matches!(
            result.status(AgentId(0)),
            Some(AgentStatus::Failed(f)) if f.tick == Tick(1) && f.component == "brake"
        ));
        assert_eq!(result.status(AgentId(1)), Some(&AgentStatus::Active));

        // One failure event, never repeated for the excluded agent.
        assert_eq!(rec.count("failure"), 1);
        assert_eq!(rec.count("failure AgentId(0) brake T1"), 1);
        assert_eq!(rec.count("insert"), 4);
    }

    #[test]
    fn abort_on_any_finishes_the_cycle_then_stops() {
        let cfg = SimConfig { failure_policy: FailurePolicy::AbortOnAny, ..config(10) };
        let mut run = RunBuilder::new(cfg, registry())
            .system(system([failing_agent("bad", 2), ticking_agent("good")]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let result = run.run(&mut rec);

        assert!(!result.succeeded);
        assert!(result.failure_reason.as_deref().is_some_and(|r| r.contains("actuator stuck")));
        assert_eq!(result.cycles_completed, 3);
        // The healthy agent still ran the failing cycle.
        assert_eq!(rec.count("insert"), 3);
        assert_eq!(rec.log.last().map(String::as_str), Some("post_run false"));
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cancel_tests {
    use super::*;

    /// Sets the flag once `at` cycles have completed.
    struct CancelAfter {
        flag: CancelFlag,
        at:   u64,
        rec:  Recorder,
    }

    impl ObservationSink for CancelAfter {
        fn update(&mut self, cycle: u64, interim: &RunResult) {
            if interim.cycles_completed == self.at {
                self.flag.cancel();
            }
            self.rec.update(cycle, interim);
        }

        fn insert_event(&mut self, event: &RunEvent) {
            self.rec.insert_event(event);
        }
    }

    #[test]
    fn cancel_stops_before_the_next_cycle() {
        let flag = CancelFlag::new();
        let mut run = RunBuilder::new(config(10), registry())
            .system(system([ticking_agent("a")]))
            .cancel_flag(flag.clone())
            .build()
            .unwrap();
        let mut sink = CancelAfter { flag, at: 3, rec: Recorder::default() };
        let result = run.run(&mut sink);

        assert!(result.cancelled);
        assert!(!result.succeeded);
        assert_eq!(result.cycles_completed, 3);
        assert_eq!(sink.rec.count("cancelled T3"), 1);
        // Completed cycles stand.
        assert_eq!(run.agents()[0].channel_value("t"), Some(&SignalValue::Int(2)));
    }

    #[test]
    fn cancel_before_start_runs_nothing() {
        let mut run = RunBuilder::new(config(10), registry())
            .system(system([ticking_agent("a")]))
            .build()
            .unwrap();
        run.cancel_flag().cancel();
        let result = run.run(&mut crate::NoopSink);

        assert!(result.cancelled);
        assert_eq!(result.cycles_completed, 0);
        assert_eq!(run.agents()[0].channel_value("t"), None);
    }
}

// ── Parallel stepping ─────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parallel"))]
mod parallel_tests {
    use super::*;

    fn noisy_agent(name: &str) -> AgentConfig {
        ticking_agent(name)
            .component(ComponentConfig::new("n", "noise").outputs(["v"]))
            .channel(ChannelConfig::new("v", SignalKind::Double, "n", std::iter::empty::<&str>()))
    }

    fn recorded(threads: usize) -> Vec<String> {
        let registry = registry().with("noise", |_| {
            Ok(boxed(FnComponent::new(|ctx| {
                let v = ctx.stochastics.uniform(0.0, 1.0)?;
                ctx.publish("noise", "v", v);
                ctx.write(0, v)
            })))
        });
        let cfg = SimConfig { num_threads: Some(threads), ..config(6) };
        let mut run = RunBuilder::new(cfg, registry)
            .system(system([noisy_agent("a"), failing_agent("b", 2), noisy_agent("c"), noisy_agent("d")]))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        run.run(&mut rec);
        rec.log
    }

    #[test]
    fn thread_count_does_not_change_the_stream() {
        let single = recorded(1);
        assert_eq!(single.iter().filter(|l| l.starts_with("failure AgentId(1) brake T2")).count(), 1);
        assert_eq!(single, recorded(4));
        assert_eq!(single, recorded(4));
    }
}
