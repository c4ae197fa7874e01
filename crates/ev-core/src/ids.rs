//! Typed identifiers.
//!
//! Every id is a thin `Copy + Ord + Hash` wrapper around an integer index
//! into one of the simulator's dense `Vec`s.  Use `.index()` when indexing.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel for "unset".
            pub const INVALID: $name = $name(<$inner>::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
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

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an evacuee in the population.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a node within one `RoadNetwork` instance.  Not stable across
    /// instances; use the network's source id to compare nodes of the full
    /// and safe networks.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed edge within one `RoadNetwork` instance.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Index of an activity inside a schedule template.
    pub struct ActivityId(u16);
}

typed_id! {
    /// Index of a building footprint.
    pub struct BuildingId(u32);
}

typed_id! {
    /// Index of a traffic sensor.
    pub struct SensorId(u32);
}
