//! Change sets between server revisions.

use crate::entity::{id_list, EntityList};
use crate::error::{WeblingError, WeblingResult};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Created, updated and deleted IDs of one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeChanges {
    /// IDs created since the base revision.
    pub created: BTreeSet<u64>,
    /// IDs updated since the base revision.
    pub updated: BTreeSet<u64>,
    /// IDs deleted since the base revision.
    pub deleted: BTreeSet<u64>,
}

impl TypeChanges {
    /// Returns true if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Changes between a base revision and the latest revision.
///
/// Built once from a replication response and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    from_revision: u64,
    to_revision: Option<u64>,
    per_type: BTreeMap<String, TypeChanges>,
}

impl ChangeSet {
    /// Parses a replication response.
    ///
    /// The payload is an object keyed by entity type, each value holding
    /// optional `created`, `updated` and `deleted` ID lists. A top-level
    /// integer `revision` is taken as the target revision.
    pub fn from_payload(from_revision: u64, payload: &Value) -> WeblingResult<Self> {
        let object = payload.as_object().ok_or_else(|| {
            WeblingError::parse(format!("changes since {from_revision}: expected a JSON object"))
        })?;

        let mut to_revision = None;
        let mut per_type = BTreeMap::new();

        for (key, body) in object {
            if key == "revision" {
                to_revision = body.as_u64();
                continue;
            }
            let Some(body) = body.as_object() else {
                continue;
            };

            let set = |name: &str| -> WeblingResult<BTreeSet<u64>> {
                Ok(id_list(body.get(name))?.into_iter().collect())
            };
            per_type.insert(
                key.clone(),
                TypeChanges {
                    created: set("created")?,
                    updated: set("updated")?,
                    deleted: set("deleted")?,
                },
            );
        }

        Ok(Self {
            from_revision,
            to_revision,
            per_type,
        })
    }

    /// Returns the base revision.
    pub fn from_revision(&self) -> u64 {
        self.from_revision
    }

    /// Returns the target revision, if the response named one.
    pub fn to_revision(&self) -> Option<u64> {
        self.to_revision
    }

    /// Returns the changes of one type.
    pub fn changes(&self, entity_type: &str) -> Option<&TypeChanges> {
        self.per_type.get(entity_type)
    }

    /// Iterates over the types with changes.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.per_type.keys().map(String::as_str)
    }

    /// Returns true if no type has changes.
    pub fn is_empty(&self) -> bool {
        self.per_type.values().all(TypeChanges::is_empty)
    }

    /// Returns the IDs of `entity_type` created since the base revision.
    pub fn created(&self, entity_type: &str) -> EntityList {
        self.list(entity_type, |c| &c.created)
    }

    /// Returns the IDs of `entity_type` updated since the base revision.
    pub fn updated(&self, entity_type: &str) -> EntityList {
        self.list(entity_type, |c| &c.updated)
    }

    /// Returns the IDs of `entity_type` deleted since the base revision.
    pub fn deleted(&self, entity_type: &str) -> EntityList {
        self.list(entity_type, |c| &c.deleted)
    }

    fn list(&self, entity_type: &str, pick: impl Fn(&TypeChanges) -> &BTreeSet<u64>) -> EntityList {
        let ids = self
            .per_type
            .get(entity_type)
            .map(|c| pick(c).iter().copied().collect())
            .unwrap_or_default();
        EntityList::new(entity_type, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_types_and_revision() {
        let payload = json!({
            "revision": 120,
            "member": {"created": [5], "updated": [6, 6], "deleted": [7]},
            "membergroup": {"updated": [2]}
        });

        let changes = ChangeSet::from_payload(100, &payload).unwrap();

        assert_eq!(changes.from_revision(), 100);
        assert_eq!(changes.to_revision(), Some(120));
        assert_eq!(changes.created("member").ids(), &[5]);
        assert_eq!(changes.updated("member").ids(), &[6]);
        assert_eq!(changes.deleted("member").ids(), &[7]);

        let groups = changes.changes("membergroup").unwrap();
        assert!(groups.created.is_empty());
        assert_eq!(groups.updated.len(), 1);
        assert_eq!(changes.types().collect::<Vec<_>>(), vec!["member", "membergroup"]);
    }

    #[test]
    fn unknown_type_is_empty() {
        let changes = ChangeSet::from_payload(1, &json!({})).unwrap();
        assert!(changes.is_empty());
        assert!(changes.created("document").is_empty());
        assert_eq!(changes.to_revision(), None);
    }

    #[test]
    fn rejects_malformed_payload() {
        assert!(ChangeSet::from_payload(1, &json!([1])).is_err());
        assert!(ChangeSet::from_payload(1, &json!({"member": {"created": "x"}})).is_err());
    }
}
