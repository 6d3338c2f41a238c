//! `ak-agent` — one agent: its components, its channels, its cycle.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                          |
//! |-----------------|-------------------------------------------------------------------|
//! | [`config`]      | `SystemConfig`, `AgentConfig`, `ComponentConfig`, `ChannelConfig`, JSON loader |
//! | [`registry`]    | `ComponentRegistry` — model name → factory (`noop`, `ecu` built in) |
//! | [`wiring`]      | Structural checks run before anything is built                    |
//! | [`store`]       | `ComponentStore`, `ChannelStore` — per-agent arenas               |
//! | [`scheduler`]   | `ComponentScheduler`, `CycleResult`, `ComponentFailure`           |
//! | [`agent`]       | `AgentModel` — owns everything above for one agent                |
//! | [`error`]       | `AgentError`, `AgentResult<T>`                                    |
//!
//! # Ownership
//!
//! An `AgentModel` exclusively owns its component and channel arenas.
//! Components and channels refer to each other only through `ComponentId`
//! and `ChannelId` indices, so dropping the agent drops everything at once.
//!
//! # One cycle
//!
//! 1. Snapshot every component's state into a `StateMapping`.
//! 2. Apply queued state-change requests and condition results.
//! 3. Step active, due components in execution order; commit their outputs.
//! 4. On the first failure, stop and mark the agent failed.

pub mod agent;
pub mod config;
pub mod error;
pub mod registry;
pub mod scheduler;
pub mod store;
pub mod wiring;


pub use agent::AgentModel;
pub use config::{
    AgentConfig, ChannelConfig, ComponentConfig, SystemConfig, load_system_json, load_system_reader,
};
pub use error::{AgentError, AgentResult};
pub use registry::{ComponentRegistry, ModelFactory};
pub use scheduler::{ComponentFailure, ComponentScheduler, CycleParts, CycleResult};
pub use store::{ChannelStore, ComponentSlot, ComponentStore, SignalChannel};
