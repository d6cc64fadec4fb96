//! Aggregate root trait for consistency boundaries.

/// Aggregate root marker + minimal interface.
///
/// An aggregate is loaded, mutated in memory and persisted as one unit. There is
/// no version tracking: concurrent writers race and the last write wins.
pub trait AggregateRoot {
    /// Aggregate identifier in its external (rendered) form.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    ///
    /// Not-yet-persisted aggregates may return an empty identifier.
    fn id(&self) -> &Self::Id;
}
