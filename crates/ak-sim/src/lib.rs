//! `ak-sim` — the run driver.
//!
//! # Cycle loop
//!
//! ```text
//! pre_run()
//! for tick in 0..config.total_cycles:
//!   ① Cancel?   — a set CancelFlag ends the run before this cycle starts.
//!   ② Agents    — every non-failed agent runs one cycle
//!                 (on a Rayon pool with the `parallel` feature).
//!   ③ Barrier   — all agents have finished this cycle.
//!   ④ Report    — per agent, in AgentId order:
//!                   insert_event(StateChange) for each transition
//!                   insert(..) for each published value
//!                   insert_event(ComponentFailure) if a component failed
//!   ⑤ Policy    — AbortOnAny ends the run after a cycle with a failure;
//!                 IsolateAgent only excludes the failed agent.
//!   ⑥ update(cycle, interim RunResult)
//! post_run(final RunResult)
//! ```
//!
//! Reporting happens after the barrier and in a fixed order, so sinks see
//! the same sequence of calls whether or not agents ran in parallel.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the agents of each cycle on Rayon's thread pool.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ak_agent::{ComponentRegistry, load_system_json};
//! use ak_core::SimConfig;
//! use ak_sim::{NoopSink, RunBuilder};
//!
//! let system = load_system_json(path)?;
//! let mut run = RunBuilder::new(config, ComponentRegistry::default())
//!     .system(system)
//!     .build()?;
//! let result = run.run(&mut NoopSink);
//! ```

pub mod builder;
pub mod cancel;
pub mod error;
pub mod result;
pub mod run;
pub mod sink;

#[cfg(test)]
mod tests;

pub use builder::RunBuilder;
pub use cancel::CancelFlag;
pub use error::{SimError, SimResult};
pub use result::{AgentStatus, RunResult};
pub use run::Run;
pub use sink::{NoopSink, ObservationSink, RunEvent};
