//! Entity identity.

use std::fmt;

/// Identity of a persisted remote entity.
///
/// Two entities are the same remote object iff type and ID are equal.
/// Entities that have not been created yet have no identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identity {
    entity_type: String,
    id: u64,
}

impl Identity {
    /// Creates an identity.
    pub fn new(entity_type: impl Into<String>, id: u64) -> Self {
        Self {
            entity_type: entity_type.into(),
            id,
        }
    }

    /// Returns the entity type tag.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Returns the numeric ID.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the API path of the entity (`/type/id`).
    pub fn path(&self) -> String {
        format!("/{}/{}", self.entity_type, self.id)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity_type, self.id)
    }
}
