//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; two
/// `Money` amounts of 12.50 are the same amount no matter where they came from.
/// To "modify" one, compute a new one.
pub trait ValueObject: Copy + PartialEq + core::fmt::Debug + core::fmt::Display {}
