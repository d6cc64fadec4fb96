//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Whether the entity has been assigned an identity yet.
    ///
    /// Nested entities are created without one and receive it on first write.
    fn has_identity(&self) -> bool;
}
