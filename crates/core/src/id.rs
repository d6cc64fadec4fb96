//! Strongly-typed identifiers and identity assignment.
//!
//! Domain entities carry identities as opaque strings (possibly empty before
//! first persistence). The store works with [`DocumentId`], the store-native key.

use core::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Store-native key of a persisted document or nested element.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

/// Identifier of an authenticated user (actor identity).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

macro_rules! impl_uuid_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
            /// for determinism.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<Uuid> for $t {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$t> for Uuid {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::from_str(s.trim())
                    .map_err(|e| DomainError::invalid_reference(format!("{} '{}': {}", $name, s, e)))?;
                Ok(Self(uuid))
            }
        }
    };
}

impl_uuid_newtype!(DocumentId, "DocumentId");
impl_uuid_newtype!(UserId, "UserId");

/// Produces globally unique, sortable identities for entities lacking one.
pub trait IdentityAssigner: Send + Sync {
    fn new_identity(&self) -> DocumentId;
}

impl<A> IdentityAssigner for Arc<A>
where
    A: IdentityAssigner + ?Sized,
{
    fn new_identity(&self) -> DocumentId {
        (**self).new_identity()
    }
}

/// Default assigner backed by UUIDv7.
#[derive(Debug, Default, Copy, Clone)]
pub struct TimeOrderedIds;

impl IdentityAssigner for TimeOrderedIds {
    fn new_identity(&self) -> DocumentId {
        DocumentId::new()
    }
}
