//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. They are
/// embedded by value inside entities and never loaded on their own.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Author {
///     id: String,
///     name: String,
/// }
///
/// impl ValueObject for Author {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
