//! `ak-core` — foundational types for the agent component kernel.
//!
//! This crate is a dependency of every other `ak-*` crate.  It has no `ak-*`
//! dependencies and only a small external stack (`rand`, `rand_chacha`,
//! `rand_distr`, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ComponentId`, `ChannelId`                 |
//! | [`state`]       | `ComponentState`, `ComponentType`, `ActivationPolicy` |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`, `FailurePolicy`      |
//! | [`stochastics`] | `StochasticsInterface`, `StochasticsService`, `Distribution` |
//! | [`error`]       | `CoreError`, `ValidationError`, `CoreResult`          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public data types.   |

pub mod error;
pub mod ids;
pub mod state;
pub mod stochastics;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult, ValidationError};
pub use ids::{AgentId, ChannelId, ComponentId};
pub use state::{ActivationPolicy, ComponentState, ComponentType};
pub use stochastics::{Distribution, StochasticsInterface, StochasticsService};
pub use time::{FailurePolicy, SimClock, SimConfig, Tick};
