//! Re-exports of performance-oriented collection types.

pub use rustc_hash::{FxHashMap, FxHashSet};
pub use smallvec::SmallVec;
pub use std::collections::BTreeMap;

/// SmallVec sized for a virtual sensor's linked sources (usually <4).
pub type SmallVec4<T> = SmallVec<[T; 4]>;

/// SmallVec sized for the cooling devices one sensor drives (usually <8).
pub type SmallVec8<T> = SmallVec<[T; 8]>;
