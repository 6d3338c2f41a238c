//! `ak-control` — component-state control for the agent component kernel.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`mapping`]     | `StateMapping` — immutable per-cycle snapshot of all states   |
//! | [`condition`]   | `StateExpr`, `Condition`, `UndefinedStateLookup`              |
//! | [`controller`]  | `ComponentStateController`, `TransitionTable`, `ControlState` |
//! | [`request`]     | `StateChangeRequest`, `StateTransition`, `TransitionCause`    |
//!
//! # Evaluation discipline
//!
//! Every cycle the scheduler captures one [`StateMapping`] before anything
//! else happens.  All condition evaluation in that cycle reads that snapshot
//! and never live component state, so the order in which components are
//! visited cannot change the outcome.  Evaluation is pure: the same
//! expression against the same snapshot always yields the same result.

pub mod condition;
pub mod controller;
pub mod mapping;
pub mod request;

#[cfg(test)]
mod tests;

pub use condition::{Condition, StateExpr, UndefinedStateLookup};
pub use controller::{ComponentStateController, ControlState, TransitionPolicy, TransitionTable};
pub use mapping::StateMapping;
pub use request::{StateChangeRequest, StateTransition, TransitionCause};
