//! ecu_demo — a few vehicles, each with a hazard sensor, an ECU, and a brake.
//!
//! Per agent the wiring is
//!
//! ```text
//! sensor ──collision/prio1/prio2/prio3──▶ ecu ──ecu_index──▶ brake
//! ```
//!
//! The sensor raises each flag at random with a per-agent probability, the
//! ECU arbitrates them into one index, and the brake applies a sampled
//! deceleration while a trigger is active.  The brake only runs while the
//! ECU is `Acting`; the `retrofit` agent's ECU starts `Disabled`, so its
//! brake is disabled in the first cycle and never engages.

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ak_agent::{ComponentRegistry, load_system_reader};
use ak_component::{ComponentModel, FnComponent, ModelError, ModelInit, ModelResult, SignalValue};
use ak_core::{AgentId, FailurePolicy, SimConfig};
use ak_sim::{ObservationSink, RunBuilder, RunEvent, RunResult};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:          u64 = 42;
const CYCLE_TIME_MS: u64 = 10;
const TOTAL_CYCLES:  u64 = 1_000; // 10 s of driving

// ── System ────────────────────────────────────────────────────────────────────

const SYSTEM_JSON: &str = r#"{
    "transitions": {
        "fallback": { "on_fulfilled": "Acting", "on_unfulfilled": "Disabled" }
    },
    "agents": [
        {
            "name": "city",
            "components": [
                { "name": "sensor", "model": "hazard", "priority": 30,
                  "outputs": ["collision", "prio1", "prio2", "prio3"],
                  "parameters": { "p_collision": 0.001, "p_trigger": 0.02 } },
                { "name": "ecu", "model": "ecu", "priority": 20,
                  "inputs": ["collision", "prio1", "prio2", "prio3"], "outputs": ["ecu_index"] },
                { "name": "brake", "type": "VehicleComponent", "model": "brake", "priority": 10,
                  "inputs": ["ecu_index"],
                  "parameters": { "decel": { "type": "Normal", "mean": 6.0, "sd": 1.5, "min": 2.0, "max": 9.5 } },
                  "condition": { "equals": [{ "component": "ecu" }, { "fixed": "Acting" }] } }
            ],
            "channels": [
                { "id": "collision", "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "prio1",     "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "prio2",     "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "prio3",     "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "ecu_index", "kind": "int",  "producer": "ecu",    "consumers": ["brake"] }
            ]
        },
        {
            "name": "highway",
            "components": [
                { "name": "sensor", "model": "hazard", "priority": 30,
                  "outputs": ["collision", "prio1", "prio2", "prio3"],
                  "parameters": { "p_collision": 0.0, "p_trigger": 0.005 } },
                { "name": "ecu", "model": "ecu", "priority": 20,
                  "inputs": ["collision", "prio1", "prio2", "prio3"], "outputs": ["ecu_index"] },
                { "name": "brake", "type": "VehicleComponent", "model": "brake", "priority": 10,
                  "inputs": ["ecu_index"],
                  "parameters": { "decel": { "type": "Uniform", "min": 3.0, "max": 8.0 } },
                  "condition": { "equals": [{ "component": "ecu" }, { "fixed": "Acting" }] } }
            ],
            "channels": [
                { "id": "collision", "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "prio1",     "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "prio2",     "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "prio3",     "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "ecu_index", "kind": "int",  "producer": "ecu",    "consumers": ["brake"] }
            ]
        },
        {
            "name": "retrofit",
            "components": [
                { "name": "sensor", "model": "hazard", "priority": 30,
                  "outputs": ["collision", "prio1", "prio2", "prio3"],
                  "parameters": { "p_collision": 0.001, "p_trigger": 0.02 } },
                { "name": "ecu", "model": "ecu", "priority": 20, "initial_state": "Disabled",
                  "inputs": ["collision", "prio1", "prio2", "prio3"], "outputs": ["ecu_index"] },
                { "name": "brake", "type": "VehicleComponent", "model": "brake", "priority": 10,
                  "inputs": ["ecu_index"],
                  "parameters": { "decel": 5.0 },
                  "condition": { "equals": [{ "component": "ecu" }, { "fixed": "Acting" }] } }
            ],
            "channels": [
                { "id": "collision", "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "prio1",     "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "prio2",     "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "prio3",     "kind": "bool", "producer": "sensor", "consumers": ["ecu"] },
                { "id": "ecu_index", "kind": "int",  "producer": "ecu",    "consumers": ["brake"] }
            ]
        }
    ]
}"#;

// ── Demo components ───────────────────────────────────────────────────────────

/// Four Bool outputs: output 0 fires with `p_collision`, outputs 1–3 each
/// with `p_trigger`.
fn hazard(init: &ModelInit<'_>) -> ModelResult<Box<dyn ComponentModel>> {
    let p_collision = init.parameters.require_double(init.component, "p_collision")?;
    let p_trigger = init.parameters.require_double(init.component, "p_trigger")?;

    Ok(Box::new(FnComponent::new(move |ctx| {
        for port in 0..4 {
            let p = if port == 0 { p_collision } else { p_trigger };
            let fired = ctx.stochastics.uniform(0.0, 1.0)? < p;
            ctx.write(port, fired)?;
        }
        Ok(())
    })))
}

/// Publishes a sampled deceleration in m/s² while the ECU reports an active
/// trigger (index 0..=3), zero otherwise.
fn brake(init: &ModelInit<'_>) -> ModelResult<Box<dyn ComponentModel>> {
    if init.parameters.get("decel").is_none() {
        return Err(ModelError::MissingParameter {
            component: init.component.to_owned(),
            name:      "decel".to_owned(),
        });
    }
    let parameters = init.parameters.clone();

    Ok(Box::new(FnComponent::new(move |ctx| {
        let index = ctx.input(0).and_then(SignalValue::as_int).unwrap_or(-1);
        let decel = if (0..=3).contains(&index) {
            parameters.draw("decel", &mut *ctx.stochastics)?.unwrap_or(0.0)
        } else {
            0.0
        };
        ctx.publish("brake", "decel", decel);
        Ok(())
    })))
}

// ── Summary sink ──────────────────────────────────────────────────────────────

/// Aggregates what the run reports into a few per-agent counters.
#[derive(Default)]
struct Summary {
    /// (agent, ECU index) → cycles.
    ecu_indices: BTreeMap<(AgentId, i64), u64>,
    /// agent → (braking cycles, summed deceleration).
    braking:     BTreeMap<AgentId, (u64, f64)>,
    transitions: usize,
    failures:    usize,
}

impl ObservationSink for Summary {
    fn pre_run(&mut self) {
        info!("run starting");
    }

    fn update(&mut self, cycle: u64, interim: &RunResult) {
        if (cycle + 1) % 250 == 0 {
            info!(cycle, failed = interim.failed_agents().count(), "progress");
        }
    }

    fn insert_event(&mut self, event: &RunEvent) {
        match event {
            RunEvent::StateChange { .. } => self.transitions += 1,
            RunEvent::ComponentFailure { .. } => self.failures += 1,
            RunEvent::Cancelled { .. } => {}
        }
    }

    fn insert(&mut self, _time_ms: u64, agent: AgentId, group: &str, key: &str, value: &SignalValue) {
        match (group, key, value) {
            ("ecu", "index", SignalValue::Int(i)) => {
                *self.ecu_indices.entry((agent, *i)).or_default() += 1;
            }
            ("brake", "decel", SignalValue::Double(d)) if *d > 0.0 => {
                let entry = self.braking.entry(agent).or_default();
                entry.0 += 1;
                entry.1 += d;
            }
            _ => {}
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== ecu_demo — agent component kernel ===");
    println!("Cycles: {TOTAL_CYCLES} × {CYCLE_TIME_MS} ms  |  Seed: {SEED}");
    println!();

    // 1. Configuration.
    let system = load_system_reader(SYSTEM_JSON.as_bytes())?;
    let config = SimConfig {
        cycle_time_ms:  CYCLE_TIME_MS,
        total_cycles:   TOTAL_CYCLES,
        seed:           SEED,
        num_threads:    None, // all logical cores
        failure_policy: FailurePolicy::IsolateAgent,
        ..SimConfig::default()
    };

    // 2. Registry: built-ins plus the demo components.
    let registry = ComponentRegistry::default()
        .with("hazard", hazard)
        .with("brake", brake);

    // 3. Build.
    let mut run = RunBuilder::new(config, registry).system(system).build()?;
    for agent in run.agents() {
        println!("{:<10} order: {}", agent.name(), agent.execution_order().join(" → "));
    }
    println!();

    // 4. Run.
    let mut summary = Summary::default();
    let t0 = Instant::now();
    let result = run.run(&mut summary);
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!(
        "  succeeded: {}  cycles: {}  transitions: {}  failures: {}",
        result.succeeded, result.cycles_completed, summary.transitions, summary.failures
    );
    println!();

    println!(
        "{:<10} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>8} {:>10}",
        "Agent", "-1", "0", "1", "2", "3", "100", "Braking", "Mean decel"
    );
    println!("{}", "-".repeat(73));
    for agent in run.agents() {
        let id = agent.id();
        let count = |i: i64| summary.ecu_indices.get(&(id, i)).copied().unwrap_or(0);
        let (braking, total) = summary.braking.get(&id).copied().unwrap_or((0, 0.0));
        let mean = if braking > 0 { total / braking as f64 } else { 0.0 };
        println!(
            "{:<10} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>8} {:>10.2}",
            agent.name(),
            count(-1),
            count(0),
            count(1),
            count(2),
            count(3),
            count(100),
            braking,
            mean,
        );
    }

    Ok(())
}
