//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value** - two value
/// objects with the same attribute values are the same value. Entities, by
/// contrast, are identified by their id regardless of attribute values.
///
/// The trait requires `Clone` (values copy), `PartialEq` (values compare)
/// and `Debug` (values log).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
