//! Entity trait: records that keep their identity while their balances change.

/// Anything addressed by a stable identifier (customers, in this bank).
pub trait Entity {
    type Id: Copy + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;
}
