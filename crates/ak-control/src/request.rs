//! State-change requests and the transitions the controller reports.

use ak_core::ComponentState;

/// An externally requested state for one component.
///
/// Queued on the agent between cycles (e.g. by a scenario action) and applied
/// by the controller at the start of the next cycle.  For that cycle it takes
/// priority over the component's condition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateChangeRequest {
    pub component: String,
    pub state:     ComponentState,
}

impl StateChangeRequest {
    pub fn new(component: impl Into<String>, state: ComponentState) -> Self {
        Self { component: component.into(), state }
    }
}

/// Why a transition happened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionCause {
    /// The component's condition was evaluated against the snapshot.
    Condition,
    /// A queued [`StateChangeRequest`].
    Request,
}

/// A state change applied by the controller.  Only actual changes are
/// reported; re-asserting the current state produces nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateTransition {
    pub component: String,
    pub from:      ComponentState,
    pub to:        ComponentState,
    pub cause:     TransitionCause,
}
