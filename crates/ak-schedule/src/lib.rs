//! `ak-schedule` — execution ordering and task timing for one agent.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`graph`]   | `TaskNode`, `Link`, `ExecutionOrder` (topological sort)        |
//! | [`timing`]  | `TaskTiming` — cycle time and offset of a component            |
//! | [`error`]   | `ConfigurationError`, `ScheduleResult<T>`                      |
//!
//! # Ordering rule
//!
//! A link `A → B` exists when `B` consumes a channel `A` produces.  The order
//! is a topological sort of those links.  Whenever several components are
//! ready at once, the one with the higher priority goes first; equal
//! priorities keep declaration order.  The result is a pure function of the
//! configuration, so every run of the same agent executes in the same order.

pub mod error;
pub mod graph;
pub mod timing;


pub use error::{ConfigurationError, ScheduleResult};
pub use graph::{ExecutionOrder, Link, TaskNode};
pub use timing::TaskTiming;
