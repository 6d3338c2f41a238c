//! Condition expressions — a small interpreter over a [`StateMapping`].
//!
//! Two closed sum types make up the language:
//!
//! - [`StateExpr`] produces a [`ComponentState`]: either a fixed value or the
//!   state of a named component looked up in the snapshot.
//! - [`Condition`] produces a `bool` from state expressions and other
//!   conditions (`Equals`, `NotEquals`, `And`, `Or`, `Not`).
//!
//! Adding a combinator means adding a variant and one match arm; the
//! compiler points at every evaluator that has to handle it.
//!
//! # Missing components
//!
//! A lookup whose name is absent from the snapshot evaluates to
//! [`ComponentState::Undefined`] instead of failing.  `Undefined` then
//! compares like any other state, so `Equals(missing, Fixed(Undefined))` is
//! fulfilled and `Equals(missing, Fixed(Acting))` is not.

use std::fmt;

use ak_core::ComponentState;

use crate::StateMapping;

// ── StateExpr ─────────────────────────────────────────────────────────────────

/// A state-valued leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StateExpr {
    /// Always evaluates to the given state.
    Fixed(ComponentState),
    /// Evaluates to the named component's state in the snapshot.
    Component(String),
}

impl StateExpr {
    pub fn fixed(state: ComponentState) -> Self {
        StateExpr::Fixed(state)
    }

    pub fn component(name: impl Into<String>) -> Self {
        StateExpr::Component(name.into())
    }

    /// Evaluate against `mapping`.  Never fails.
    #[inline]
    pub fn get(&self, mapping: &StateMapping) -> ComponentState {
        match self {
            StateExpr::Fixed(state)   => *state,
            StateExpr::Component(name) => mapping.state_of(name),
        }
    }

    fn collect_missing<'a>(&'a self, mapping: &StateMapping, out: &mut Vec<UndefinedStateLookup<'a>>) {
        if let StateExpr::Component(name) = self {
            if !mapping.contains(name) {
                out.push(UndefinedStateLookup { name });
            }
        }
    }
}

// ── Condition ─────────────────────────────────────────────────────────────────

/// A boolean node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Condition {
    Equals(StateExpr, StateExpr),
    NotEquals(StateExpr, StateExpr),
    /// Fulfilled when every child is; an empty list is fulfilled.
    And(Vec<Condition>),
    /// Fulfilled when any child is; an empty list is not.
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn equals(left: StateExpr, right: StateExpr) -> Self {
        Condition::Equals(left, right)
    }

    /// Shorthand for `Equals(Component(name), Fixed(state))`.
    pub fn component_is(name: impl Into<String>, state: ComponentState) -> Self {
        Condition::Equals(StateExpr::component(name), StateExpr::Fixed(state))
    }

    pub fn negate(self) -> Self {
        Condition::Not(Box::new(self))
    }

    /// Evaluate against `mapping`.
    pub fn is_fulfilled(&self, mapping: &StateMapping) -> bool {
        match self {
            Condition::Equals(l, r)    => l.get(mapping) == r.get(mapping),
            Condition::NotEquals(l, r) => l.get(mapping) != r.get(mapping),
            Condition::And(children)   => children.iter().all(|c| c.is_fulfilled(mapping)),
            Condition::Or(children)    => children.iter().any(|c| c.is_fulfilled(mapping)),
            Condition::Not(inner)      => !inner.is_fulfilled(mapping),
        }
    }

    /// Every component lookup in this tree whose name is missing from
    /// `mapping`, in depth-first order.
    pub fn undefined_lookups<'a>(&'a self, mapping: &StateMapping) -> Vec<UndefinedStateLookup<'a>> {
        let mut out = Vec::new();
        self.collect_missing(mapping, &mut out);
        out
    }

    /// Names of all components this condition reads.
    pub fn referenced_components<'a>(&'a self) -> Vec<&'a str> {
        let mut out = Vec::new();
        self.visit_leaves(&mut |leaf: &'a StateExpr| {
            if let StateExpr::Component(name) = leaf {
                out.push(name.as_str());
            }
        });
        out
    }

    fn collect_missing<'a>(&'a self, mapping: &StateMapping, out: &mut Vec<UndefinedStateLookup<'a>>) {
        match self {
            Condition::Equals(l, r) | Condition::NotEquals(l, r) => {
                l.collect_missing(mapping, out);
                r.collect_missing(mapping, out);
            }
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    child.collect_missing(mapping, out);
                }
            }
            Condition::Not(inner) => inner.collect_missing(mapping, out),
        }
    }

    fn visit_leaves<'a>(&'a self, f: &mut impl FnMut(&'a StateExpr)) {
        match self {
            Condition::Equals(l, r) | Condition::NotEquals(l, r) => {
                f(l);
                f(r);
            }
            Condition::And(children) | Condition::Or(children) => {
                for child in children {
                    child.visit_leaves(f);
                }
            }
            Condition::Not(inner) => inner.visit_leaves(f),
        }
    }
}

// ── UndefinedStateLookup ──────────────────────────────────────────────────────

/// Diagnostic for a lookup that missed the snapshot.
///
/// Not an error: the lookup already evaluated to `Undefined`.  The controller
/// reports these at debug level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndefinedStateLookup<'a> {
    pub name: &'a str,
}

impl fmt::Display for UndefinedStateLookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component {:?} is not in the state snapshot; treated as Undefined", self.name)
    }
}
