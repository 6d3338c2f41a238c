use ak_core::ValidationError;
use thiserror::Error;

use crate::SignalKind;

/// Why a component step failed.
///
/// Any `Err` from [`ComponentModel::step`][crate::ComponentModel::step] is a
/// component failure: the agent is marked failed and the step is not retried.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("output port {port} does not exist")]
    UnknownOutput { port: usize },

    #[error("channel {channel:?} carries {expected}, got {found}")]
    KindMismatch {
        channel:  String,
        expected: SignalKind,
        found:    SignalKind,
    },

    #[error("arbitration failed: {0}")]
    Arbitration(#[from] ArbitrationError),

    #[error("invalid sampling parameters: {0}")]
    Stochastics(#[from] ValidationError),

    #[error("{0}")]
    Failed(String),
}

pub type StepResult<T> = Result<T, StepError>;

/// Why a component model could not be constructed from its configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("{component}: expected {expected} {direction} port(s), found {found}")]
    PortCount {
        component: String,
        direction: &'static str,
        expected:  usize,
        found:     usize,
    },

    #[error("{component}: {direction} port {port} ({channel:?}) must carry {expected}, found {found}")]
    PortKind {
        component: String,
        direction: &'static str,
        port:      usize,
        channel:   String,
        expected:  SignalKind,
        found:     SignalKind,
    },

    #[error("{component}: missing parameter {name:?}")]
    MissingParameter { component: String, name: String },

    #[error("{component}: parameter {name:?} {reason}")]
    InvalidParameter {
        component: String,
        name:      String,
        reason:    String,
    },
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Misuse of an [`ArbitrationPattern`][crate::ArbitrationPattern].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArbitrationError {
    #[error("arbitration needs at least one outcome")]
    NoOutcomes,

    #[error("expected {expected} trigger(s), got {found}")]
    TriggerCount { expected: usize, found: usize },
}
