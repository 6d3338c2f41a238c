//! `ak-component` — the component model trait and what components exchange.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                        |
//! |-------------------|-----------------------------------------------------------------|
//! | [`signal`]        | `SignalValue`, `SignalKind`, `Port`                             |
//! | [`params`]        | `Parameters`, `ParameterValue` — per-component configuration    |
//! | [`context`]       | `StepContext<'a>`, `CycleInfo`, `Observation`, `StepOutput`     |
//! | [`model`]         | `ComponentModel` trait, `ModelInit`, `FnComponent`              |
//! | [`arbitration`]   | `ArbitrationPattern` — priority triggers with hysteresis        |
//! | [`ecu`]           | `EcuComponent` — four-trigger arbitration over Bool channels    |
//! | [`noop`]          | `NoopComponent` — steps without reading or writing anything     |
//! | [`error`]         | `StepError`, `ModelError`, `ArbitrationError`                   |
//!
//! # Step discipline
//!
//! A component never touches a channel directly.  The scheduler copies the
//! current value of every input channel into the [`StepContext`], the
//! component stages its outputs there, and the scheduler commits them only
//! after `step` returned `Ok`.  A failed or panicking step therefore leaves
//! every channel exactly as it was.

pub mod arbitration;
pub mod context;
pub mod ecu;
pub mod error;
pub mod model;
pub mod noop;
pub mod params;
pub mod signal;

#[cfg(test)]
mod tests;

pub use arbitration::ArbitrationPattern;
pub use context::{CycleInfo, Observation, StepContext, StepOutput};
pub use ecu::EcuComponent;
pub use error::{ArbitrationError, ModelError, ModelResult, StepError, StepResult};
pub use model::{ComponentModel, FnComponent, ModelInit};
pub use noop::NoopComponent;
pub use params::{ParameterValue, Parameters};
pub use signal::{Port, SignalKind, SignalValue};
