//! Strongly typed, zero-cost identifier wrappers.
//!
//! Components and channels live in per-agent arenas (`Vec`s owned by the
//! agent), so their IDs are plain arena indices.  They are only meaningful
//! inside the agent that issued them.

use std::fmt;

/// Generate a typed index wrapper around `u32`.
macro_rules! arena_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Wrap an arena position.
            ///
            /// Arena lengths are bounded by configuration size, far below
            /// `u32::MAX`; larger positions saturate to `INVALID`.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                u32::try_from(i).map($name).unwrap_or(Self::INVALID)
            }

            /// All IDs of an arena holding `count` entries, in ascending order.
            pub fn range(count: usize) -> impl Iterator<Item = $name> {
                (0..count).map($name::from_index)
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

arena_id! {
    /// Index of an agent within a run.
    pub struct AgentId;
}

arena_id! {
    /// Index of a component inside its owning agent's component arena.
    pub struct ComponentId;
}

arena_id! {
    /// Index of a signal channel inside its owning agent's channel arena.
    pub struct ChannelId;
}
