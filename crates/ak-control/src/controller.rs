//! The component-state controller.
//!
//! The controller evaluates conditions and applies transitions; it does not
//! decide what a fulfilled or unfulfilled condition *means*.  That mapping is
//! configuration, held in a [`TransitionTable`] keyed by [`ComponentType`].

use std::collections::BTreeMap;

use ak_core::{ComponentState, ComponentType};
use tracing::{debug, warn};

use crate::{Condition, StateChangeRequest, StateMapping, StateTransition, TransitionCause};

// ── TransitionPolicy ──────────────────────────────────────────────────────────

/// Target states for one component type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPolicy {
    /// State entered while the condition holds.
    pub on_fulfilled: ComponentState,
    /// State entered while it does not; `None` leaves the state unchanged.
    pub on_unfulfilled: Option<ComponentState>,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self {
            on_fulfilled:   ComponentState::Acting,
            on_unfulfilled: Some(ComponentState::Disabled),
        }
    }
}

// ── TransitionTable ───────────────────────────────────────────────────────────

/// Per-type transition policies with a fallback for unlisted types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransitionTable {
    pub fallback: TransitionPolicy,
    pub by_type:  BTreeMap<ComponentType, TransitionPolicy>,
}

impl TransitionTable {
    pub fn new(fallback: TransitionPolicy) -> Self {
        Self { fallback, by_type: BTreeMap::new() }
    }

    /// Builder-style [`set`][Self::set].
    pub fn with(mut self, component_type: ComponentType, policy: TransitionPolicy) -> Self {
        self.set(component_type, policy);
        self
    }

    pub fn set(&mut self, component_type: ComponentType, policy: TransitionPolicy) {
        self.by_type.insert(component_type, policy);
    }

    #[inline]
    pub fn policy_for(&self, component_type: ComponentType) -> TransitionPolicy {
        self.by_type.get(&component_type).copied().unwrap_or(self.fallback)
    }
}

// ── ControlState ──────────────────────────────────────────────────────────────

/// The controller's view of one component: identity, state, and condition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControlState {
    pub name:           String,
    pub component_type: ComponentType,
    pub state:          ComponentState,
    /// `None` means the component keeps whatever state it has.
    pub condition:      Option<Condition>,
}

impl ControlState {
    pub fn new(name: impl Into<String>, component_type: ComponentType, state: ComponentState) -> Self {
        Self { name: name.into(), component_type, state, condition: None }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

// ── ComponentStateController ──────────────────────────────────────────────────

/// Applies condition results and queued requests to component states.
#[derive(Clone, Debug, Default)]
pub struct ComponentStateController {
    table: TransitionTable,
}

impl ComponentStateController {
    pub fn new(table: TransitionTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// The state `entry` should move to, or `None` to keep its current one.
    ///
    /// A request wins over the condition.  Pure: reads only `mapping` and
    /// `entry`.
    pub fn next_state(
        &self,
        mapping: &StateMapping,
        entry:   &ControlState,
        request: Option<ComponentState>,
    ) -> Option<ComponentState> {
        if request.is_some() {
            return request;
        }
        let condition = entry.condition.as_ref()?;
        let policy = self.table.policy_for(entry.component_type);
        if condition.is_fulfilled(mapping) {
            Some(policy.on_fulfilled)
        } else {
            policy.on_unfulfilled
        }
    }

    /// [`next_state`][Self::next_state] for every entry, without requests.
    pub fn next_states(&self, mapping: &StateMapping, entries: &[ControlState]) -> Vec<Option<ComponentState>> {
        entries.iter().map(|entry| self.next_state(mapping, entry, None)).collect()
    }

    /// Evaluate every entry against `mapping` and write the resulting states.
    ///
    /// When several requests name the same component the last one applies.
    /// Requests naming no entry are dropped with a warning.  Returns only the
    /// transitions that changed a state, in entry order.
    pub fn apply<'e, I>(
        &self,
        mapping:  &StateMapping,
        requests: &[StateChangeRequest],
        entries:  I,
    ) -> Vec<StateTransition>
    where
        I: IntoIterator<Item = &'e mut ControlState>,
    {
        let mut pending: BTreeMap<&str, ComponentState> = requests
            .iter()
            .map(|r| (r.component.as_str(), r.state))
            .collect();

        let mut transitions = Vec::new();
        for entry in entries {
            let request = pending.remove(entry.name.as_str());
            if request.is_none() {
                if let Some(condition) = &entry.condition {
                    for lookup in condition.undefined_lookups(mapping) {
                        debug!(component = %entry.name, missing = lookup.name, "{lookup}");
                    }
                }
            }

            let Some(target) = self.next_state(mapping, entry, request) else {
                continue;
            };
            if target == entry.state {
                continue;
            }

            let cause = if request.is_some() { TransitionCause::Request } else { TransitionCause::Condition };
            debug!(component = %entry.name, from = %entry.state, to = %target, ?cause, "state transition");
            transitions.push(StateTransition {
                component: entry.name.clone(),
                from:      entry.state,
                to:        target,
                cause,
            });
            entry.state = target;
        }

        for (name, state) in pending {
            warn!(component = name, %state, "state change request for unknown component dropped");
        }
        transitions
    }
}
