//! Arena index types.
//!
//! Sensors and cooling devices live in flat vectors built once at startup.
//! Each ID wraps the vector index so a `SensorId` cannot be used where a
//! `CdevId` is expected.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub usize);

        impl $name {
            /// Create a new ID from an arena index.
            pub fn new(index: usize) -> Self {
                Self(index)
            }

            /// Get the arena index.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Index of a sensor in the topology arena.
    SensorId
);

define_id!(
    /// Index of a cooling device in the topology arena.
    CdevId
);
