//! Typed indices for users, network elements and catalog entries.
//!
//! Each id is a `u32` newtype.  Ids of different kinds cannot be mixed up,
//! and `.index()` turns one into a `Vec` position for the CSR arrays and
//! catalogs that own the underlying data.

use std::fmt;

/// Declare a `u32` index newtype displayed as `"<label> <n>"`.
macro_rules! typed_id {
    ($label:literal, $(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Placeholder for "no such element", e.g. the predecessor edge of
            /// a route's first node.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, " {}"), self.0)
            }
        }

        /// Fails when `n` does not fit the 32-bit id space.
        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    "user",
    /// A synthetic user.  Unique across all profiles of a run and part of
    /// the user's RNG seed.
    pub struct AgentId;
}

typed_id! {
    "node",
    /// An intersection of a street network.
    pub struct NodeId;
}

typed_id! {
    "edge",
    /// A directed street segment; a two-way road is two edges.
    pub struct EdgeId;
}

typed_id! {
    "location",
    /// Position of an entry inside one location catalog.  Ids of the
    /// home/work catalog and the event catalog live in separate spaces.
    pub struct LocationId;
}
