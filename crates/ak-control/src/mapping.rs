//! `StateMapping` — the per-cycle snapshot read by condition evaluation.

use std::collections::BTreeMap;

use ak_core::{ComponentState, ComponentType};

/// Immutable snapshot mapping component name → (type, state).
///
/// Built once at the start of a cycle with [`StateMapping::capture`] (or
/// `collect()`), then only read.  Backed by a `BTreeMap` so iteration order
/// is stable across runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateMapping {
    entries: BTreeMap<String, (ComponentType, ComponentState)>,
}

impl StateMapping {
    /// Snapshot `(name, type, state)` triples.
    ///
    /// If a name occurs twice the later entry wins; agent builders reject
    /// duplicate component names before this can happen.
    pub fn capture<'a, I>(components: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, ComponentType, ComponentState)>,
    {
        components
            .into_iter()
            .map(|(name, ty, state)| (name.to_owned(), ty, state))
            .collect()
    }

    /// Type and state of `name`, or `None` if it is not in the snapshot.
    #[inline]
    pub fn get(&self, name: &str) -> Option<(ComponentType, ComponentState)> {
        self.entries.get(name).copied()
    }

    /// State of `name`, or [`ComponentState::Undefined`] if absent.
    #[inline]
    pub fn state_of(&self, name: &str) -> ComponentState {
        self.get(name).map_or(ComponentState::Undefined, |(_, state)| state)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ComponentType, ComponentState)> + '_ {
        self.entries
            .iter()
            .map(|(name, &(ty, state))| (name.as_str(), ty, state))
    }
}

impl FromIterator<(String, ComponentType, ComponentState)> for StateMapping {
    fn from_iter<T: IntoIterator<Item = (String, ComponentType, ComponentState)>>(iter: T) -> Self {
        let entries = iter
            .into_iter()
            .map(|(name, ty, state)| (name, (ty, state)))
            .collect();
        Self { entries }
    }
}
