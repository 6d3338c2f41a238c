//! Component runtime state and classification.

use std::fmt;
use std::str::FromStr;

use crate::CoreError;

// ── ComponentState ────────────────────────────────────────────────────────────

/// Runtime state of a component, owned and mutated by the state controller.
///
/// `Undefined` doubles as the value of a condition lookup that names a
/// component missing from the cycle's snapshot.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentState {
    #[default]
    Undefined,
    Disabled,
    Armed,
    Acting,
}

impl ComponentState {
    pub const ALL: [ComponentState; 4] = [
        ComponentState::Undefined,
        ComponentState::Disabled,
        ComponentState::Armed,
        ComponentState::Acting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentState::Undefined => "Undefined",
            ComponentState::Disabled  => "Disabled",
            ComponentState::Armed     => "Armed",
            ComponentState::Acting    => "Acting",
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentState::ALL
            .into_iter()
            .find(|state| state.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::Parse(format!("unknown component state {s:?}")))
    }
}

// ── ComponentType ─────────────────────────────────────────────────────────────

/// Coarse classification of a component.
///
/// State transition policies are configured per type, not per component.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentType {
    Driver,
    TrajectoryFollower,
    VehicleComponent,
    #[default]
    Undefined,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComponentType::Driver             => "Driver",
            ComponentType::TrajectoryFollower => "TrajectoryFollower",
            ComponentType::VehicleComponent   => "VehicleComponent",
            ComponentType::Undefined          => "Undefined",
        };
        f.write_str(s)
    }
}

// ── ActivationPolicy ──────────────────────────────────────────────────────────

/// Which component states count as "active" for execution in a cycle.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivationPolicy {
    /// Only `Acting` components execute.
    #[default]
    ActingOnly,
    /// `Armed` components execute as well (e.g. to watch their triggers).
    ArmedOrActing,
}

impl ActivationPolicy {
    #[inline]
    pub fn is_active(self, state: ComponentState) -> bool {
        match self {
            ActivationPolicy::ActingOnly    => state == ComponentState::Acting,
            ActivationPolicy::ArmedOrActing => {
                matches!(state, ComponentState::Armed | ComponentState::Acting)
            }
        }
    }
}
