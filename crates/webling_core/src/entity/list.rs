//! Lists of entity IDs.

/// An ordered list of entity IDs of one type.
///
/// Lists are returned by queries and relations. They hold IDs only; resolve
/// them through [`EntityManager::resolve`](crate::EntityManager::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityList {
    entity_type: String,
    ids: Vec<u64>,
}

impl EntityList {
    /// Creates a list.
    pub fn new(entity_type: impl Into<String>, ids: Vec<u64>) -> Self {
        Self {
            entity_type: entity_type.into(),
            ids,
        }
    }

    /// Returns the type of the listed entities.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Returns the IDs in server order.
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true if the list contains `id`.
    pub fn contains(&self, id: u64) -> bool {
        self.ids.contains(&id)
    }

    /// Iterates over the IDs.
    pub fn iter(&self) -> std::slice::Iter<'_, u64> {
        self.ids.iter()
    }
}

impl<'a> IntoIterator for &'a EntityList {
    type Item = &'a u64;
    type IntoIter = std::slice::Iter<'a, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}
