//! The in-memory representation of a remote entity.

use crate::entity::id::Identity;
use crate::entity::kind::EntityKind;
use crate::entity::list::EntityList;
use crate::property::{FileRef, ImageRef, PropertyValue};
use parking_lot::RwLock;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A live entity shared between the identity cache and its holders.
///
/// Mutations through one handle are visible to every other handle of the
/// same identity.
pub type SharedEntity = Arc<RwLock<Entity>>;

/// A remote entity.
///
/// `children` is populated by hydration only and is never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: Option<u64>,
    kind: EntityKind,
    readonly: bool,
    properties: BTreeMap<String, PropertyValue>,
    children: BTreeMap<String, Vec<u64>>,
    parents: Vec<u64>,
    links: BTreeMap<String, Vec<u64>>,
}

impl Entity {
    /// Creates a new, unpersisted entity.
    pub fn new(kind: impl Into<EntityKind>) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            readonly: false,
            properties: BTreeMap::new(),
            children: BTreeMap::new(),
            parents: Vec::new(),
            links: BTreeMap::new(),
        }
    }

    /// Sets the ID.
    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the readonly flag.
    #[must_use]
    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Sets the child IDs of one child type.
    #[must_use]
    pub fn with_children(mut self, child_type: impl Into<String>, ids: Vec<u64>) -> Self {
        self.children.insert(child_type.into(), ids);
        self
    }

    /// Wraps the entity into a shared handle.
    pub fn into_shared(self) -> SharedEntity {
        Arc::new(RwLock::new(self))
    }

    /// Returns the ID, or `None` if the entity was never persisted.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    pub(crate) fn unset_id(&mut self) {
        self.id = None;
    }

    /// Returns the entity kind.
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Returns the type tag.
    pub fn entity_type(&self) -> &str {
        self.kind.as_str()
    }

    /// Returns the identity of a persisted entity.
    pub fn identity(&self) -> Option<Identity> {
        self.id.map(|id| Identity::new(self.entity_type(), id))
    }

    /// Returns true if the remote store forbids writes to this entity.
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Returns all properties.
    pub fn properties(&self) -> &BTreeMap<String, PropertyValue> {
        &self.properties
    }

    /// Replaces all properties.
    pub fn set_properties(&mut self, properties: BTreeMap<String, PropertyValue>) -> &mut Self {
        self.properties = properties;
        self
    }

    /// Returns one property.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Sets one property.
    pub fn set_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> &mut Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Returns the image stored in an image property.
    pub fn image(&self, name: &str) -> Option<&ImageRef> {
        self.property(name).and_then(PropertyValue::as_image)
    }

    /// Returns the file stored in a file or image property.
    pub fn file(&self, name: &str) -> Option<&FileRef> {
        self.property(name).and_then(PropertyValue::as_file)
    }

    /// Returns the children of one type.
    pub fn children(&self, child_type: &str) -> Option<EntityList> {
        self.children
            .get(child_type)
            .map(|ids| EntityList::new(child_type, ids.clone()))
    }

    /// Returns the child types present on this entity.
    pub fn child_types(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Returns the parent IDs.
    pub fn parent_ids(&self) -> &[u64] {
        &self.parents
    }

    /// Returns the parents as a list of the kind's parent type.
    ///
    /// `None` for kinds without a known parent type.
    pub fn parents(&self) -> Option<EntityList> {
        self.kind
            .parent_type()
            .map(|parent_type| EntityList::new(parent_type, self.parents.clone()))
    }

    /// Replaces the parent IDs.
    pub fn set_parents(&mut self, ids: Vec<u64>) -> &mut Self {
        self.parents = ids;
        self
    }

    /// Returns the links of one type.
    pub fn links(&self, link_type: &str) -> Option<EntityList> {
        self.links
            .get(link_type)
            .map(|ids| EntityList::new(link_type, ids.clone()))
    }

    /// Replaces the links of one type.
    pub fn set_links(&mut self, link_type: impl Into<String>, ids: Vec<u64>) -> &mut Self {
        self.links.insert(link_type.into(), ids);
        self
    }

    /// Builds the write payload.
    ///
    /// Children are readonly in the API and never part of the payload.
    pub fn to_payload(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();

        json!({
            "type": self.entity_type(),
            "readonly": self.readonly,
            "properties": properties,
            "parents": self.parents,
            "links": self.links,
        })
    }

    /// Copies the remote state of `other` into this entity.
    pub(crate) fn refresh_from(&mut self, other: Entity) {
        let id = self.id;
        *self = other;
        if self.id.is_none() {
            self.id = id;
        }
    }
}
