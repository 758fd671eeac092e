//! Entity type discriminator.

use std::fmt;

/// The type of a remote entity.
///
/// Known types carry type-specific behavior such as their parent type.
/// Any other type tag is kept as [`EntityKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A member record.
    Member,
    /// A group of members.
    Membergroup,
    /// A stored document.
    Document,
    /// A folder of documents.
    Documentgroup,
    /// Any other entity type.
    Other(String),
}

impl EntityKind {
    /// Resolves a type tag.
    pub fn from_type(entity_type: &str) -> Self {
        match entity_type {
            "member" => EntityKind::Member,
            "membergroup" => EntityKind::Membergroup,
            "document" => EntityKind::Document,
            "documentgroup" => EntityKind::Documentgroup,
            other => EntityKind::Other(other.to_string()),
        }
    }

    /// Returns the type tag used in API paths.
    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::Member => "member",
            EntityKind::Membergroup => "membergroup",
            EntityKind::Document => "document",
            EntityKind::Documentgroup => "documentgroup",
            EntityKind::Other(tag) => tag,
        }
    }

    /// Returns the type of the entities listed in `parents`.
    pub fn parent_type(&self) -> Option<&'static str> {
        match self {
            EntityKind::Member | EntityKind::Membergroup => Some("membergroup"),
            EntityKind::Document | EntityKind::Documentgroup => Some("documentgroup"),
            EntityKind::Other(_) => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EntityKind {
    fn from(entity_type: &str) -> Self {
        Self::from_type(entity_type)
    }
}
