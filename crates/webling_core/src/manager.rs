//! Entity manager.
//!
//! The manager mediates every read and write against the remote store and
//! keeps one live instance per remote identity in its [`IdentityCache`].

use crate::cache::IdentityCache;
use crate::changes::ChangeSet;
use crate::config::ManagerConfig;
use crate::entity::{
    parse_id, DefaultEntityFactory, Entity, EntityFactory, EntityList, SharedEntity,
};
use crate::error::{WeblingError, WeblingResult};
use crate::property::Definition;
use crate::repository::Repository;
use crate::transport::Transport;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use webling_query::{escape_property, Query};

/// Sort direction of an order specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Returns the wire keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Validates a direction keyword for `property`.
    ///
    /// Only the exact keywords `ASC` and `DESC` are accepted.
    pub fn parse(property: &str, direction: &str) -> WeblingResult<Self> {
        match direction {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(WeblingError::InvalidSortDirection {
                property: property.to_string(),
                direction: direction.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders an order specification as `<property> <DIR>, ...`.
///
/// # Errors
///
/// Returns [`WeblingError::InvalidSortDirection`] for the first pair whose
/// direction is neither `ASC` nor `DESC`.
pub fn prepare_order(order: &[(&str, &str)]) -> WeblingResult<String> {
    let mut parts = Vec::with_capacity(order.len());
    for (property, direction) in order {
        let direction = SortDirection::parse(property, direction)?;
        parts.push(format!("{} {}", escape_property(property), direction));
    }
    Ok(parts.join(", "))
}

/// Identity map and unit of work over remote entities.
///
/// Every cache-touching operation takes `&mut self`; wrap the manager in a
/// lock to share it between threads.
pub struct EntityManager<T: Transport, F: EntityFactory = DefaultEntityFactory> {
    transport: T,
    factory: F,
    config: ManagerConfig,
    cache: IdentityCache,
    definition: Option<Definition>,
}

impl<T: Transport> EntityManager<T> {
    /// Creates a manager with the default entity factory.
    ///
    /// The default [`ManagerConfig`] hydrates untyped: property values stay
    /// as the API sent them until the definition is loaded, either through
    /// [`EntityManager::definition`] or by enabling
    /// [`ManagerConfig::typed_properties()`].
    pub fn new(transport: T) -> Self {
        Self::with_factory(transport, DefaultEntityFactory)
    }
}

impl<T: Transport, F: EntityFactory> EntityManager<T, F> {
    /// Creates a manager with a custom entity factory.
    pub fn with_factory(transport: T, factory: F) -> Self {
        Self {
            transport,
            factory,
            config: ManagerConfig::default(),
            cache: IdentityCache::new(),
            definition: None,
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the entity factory.
    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Returns the identity cache.
    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    /// Drops every cached entity.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Returns the entity definition, fetching it on first use.
    pub fn definition(&mut self) -> WeblingResult<&Definition> {
        let definition = match self.definition.take() {
            Some(definition) => definition,
            None => {
                debug!("fetching entity definition");
                let raw = self.transport.get("/definition", &[("format", "full")])?;
                Definition::from_json(&raw)?
            }
        };
        Ok(self.definition.insert(definition))
    }

    /// Lists entities of `entity_type`.
    ///
    /// Without `full` only IDs are fetched and nothing is cached. With `full`
    /// every returned object is hydrated and cached; instances that are
    /// already cached are refreshed in place unless
    /// [`ManagerConfig::refresh_on_list()`] is off.
    ///
    /// The order is validated before any request is made.
    pub fn find_all(
        &mut self,
        entity_type: &str,
        query: Option<&Query>,
        order: &[(&str, &str)],
        full: bool,
    ) -> WeblingResult<EntityList> {
        let order = prepare_order(order)?;
        let filter = query.map(Query::build).transpose()?.unwrap_or_default();

        let mut params = Vec::with_capacity(3);
        if !filter.is_empty() {
            params.push(("filter", filter.as_str()));
        }
        if !order.is_empty() {
            params.push(("order", order.as_str()));
        }
        if full {
            params.push(("format", "full"));
        }

        let path = format!("/{entity_type}");
        debug!(entity_type, filter = %filter, order = %order, full, "listing entities");
        let data = self.transport.get(&path, &params)?;

        if !full {
            let ids = match data.get("objects") {
                Some(objects @ Value::Array(_)) => crate::entity::id_list(Some(objects))?,
                _ => {
                    return Err(WeblingError::parse(format!(
                        "{path}: expected an \"objects\" list"
                    )))
                }
            };
            return Ok(EntityList::new(entity_type, ids));
        }

        let Value::Array(objects) = data else {
            return Err(WeblingError::parse(format!(
                "{path}: expected a list of objects for format=full"
            )));
        };

        self.load_definition_if_typed()?;

        let mut ids = Vec::with_capacity(objects.len());
        for object in &objects {
            let id = object
                .get("id")
                .ok_or_else(|| WeblingError::parse(format!("{path}: object without \"id\"")))
                .and_then(parse_id)?;
            let entity = self.hydrate(entity_type, id, object)?;

            match self.cache.get(entity_type, id) {
                Some(cached) if self.config.refresh_on_list => cached.write().refresh_from(entity),
                Some(_) => {}
                None => {
                    self.cache.put(entity_type, id, entity.into_shared());
                }
            }
            ids.push(id);
        }

        Ok(EntityList::new(entity_type, ids))
    }

    /// Lists entities of `entity_type` matching `query`.
    pub fn find_by(
        &mut self,
        entity_type: &str,
        query: &Query,
        order: &[(&str, &str)],
        full: bool,
    ) -> WeblingResult<EntityList> {
        self.find_all(entity_type, Some(query), order, full)
    }

    /// Returns the live instance of `entity_type`/`id`.
    ///
    /// A cached instance is returned without a remote call.
    pub fn find(&mut self, entity_type: &str, id: u64) -> WeblingResult<SharedEntity> {
        if let Some(cached) = self.cache.get(entity_type, id) {
            debug!(entity_type, id, "cache hit");
            return Ok(cached);
        }

        let raw = self.transport.get(&format!("/{entity_type}/{id}"), &[])?;
        self.load_definition_if_typed()?;
        let entity = self.hydrate(entity_type, id, &raw)?.into_shared();

        self.cache.put(entity_type, id, Arc::clone(&entity));
        Ok(entity)
    }

    /// Resolves every ID of `list` in order.
    pub fn resolve(&mut self, list: &EntityList) -> WeblingResult<Vec<SharedEntity>> {
        list.iter()
            .map(|&id| self.find(list.entity_type(), id))
            .collect()
    }

    /// Creates or updates `entity` in the remote store.
    ///
    /// Entities without an ID are created and receive the new ID. On success
    /// the entity becomes the cached instance of its identity; if another
    /// instance is already cached, that instance takes the persisted state
    /// and stays cached. On failure neither the cache nor the entity is
    /// changed.
    pub fn persist(&mut self, entity: &SharedEntity) -> WeblingResult<()> {
        let (entity_type, id, payload) = {
            let guard = entity.read();
            if guard.is_readonly() {
                return Err(WeblingError::ReadonlyViolation {
                    entity_type: guard.entity_type().to_string(),
                    id: guard.id(),
                });
            }
            (guard.entity_type().to_string(), guard.id(), guard.to_payload())
        };

        let id = match id {
            Some(id) => {
                self.transport
                    .put(&format!("/{entity_type}/{id}"), &payload)
                    .inspect_err(|e| warn!("Updating {entity_type}/{id} failed: {e}"))?;
                info!("Updated {}/{}", entity_type, id);
                id
            }
            None => {
                let body = self
                    .transport
                    .post(&format!("/{entity_type}"), &payload)
                    .inspect_err(|e| warn!("Creating {entity_type} failed: {e}"))?;
                let id = body.trim().trim_matches('"').parse::<u64>().map_err(|_| {
                    WeblingError::parse(format!("invalid ID in create response: {body:?}"))
                })?;
                entity.write().set_id(id);
                info!("Created {}/{}", entity_type, id);
                id
            }
        };

        match self.cache.get(&entity_type, id) {
            Some(cached) if !Arc::ptr_eq(&cached, entity) => {
                let persisted = entity.read().clone();
                cached.write().refresh_from(persisted);
            }
            Some(_) => {}
            None => {
                self.cache.put(&entity_type, id, Arc::clone(entity));
            }
        }
        Ok(())
    }

    /// Deletes `entity` from the remote store.
    ///
    /// On success the cache entry is evicted and both the entity and the
    /// evicted instance lose their ID.
    pub fn remove(&mut self, entity: &SharedEntity) -> WeblingResult<()> {
        let (entity_type, id) = {
            let guard = entity.read();
            let Some(id) = guard.id() else {
                return Err(WeblingError::MissingIdentity {
                    entity_type: guard.entity_type().to_string(),
                });
            };
            if guard.is_readonly() {
                return Err(WeblingError::ReadonlyViolation {
                    entity_type: guard.entity_type().to_string(),
                    id: Some(id),
                });
            }
            (guard.entity_type().to_string(), id)
        };

        self.transport
            .delete(&format!("/{entity_type}/{id}"))
            .inspect_err(|e| warn!("Deleting {entity_type}/{id} failed: {e}"))?;

        if let Some(cached) = self.cache.remove(&entity_type, id) {
            if !Arc::ptr_eq(&cached, entity) {
                cached.write().unset_id();
            }
        }
        entity.write().unset_id();
        info!("Deleted {}/{}", entity_type, id);
        Ok(())
    }

    /// Wraps `entity` into a shared handle.
    ///
    /// An entity with an ID becomes the cached instance of its identity. If
    /// that identity is already cached, the cached instance takes the state
    /// of `entity` and is returned.
    pub fn attach(&mut self, entity: Entity) -> SharedEntity {
        let Some(id) = entity.id() else {
            return entity.into_shared();
        };

        let entity_type = entity.entity_type().to_string();
        match self.cache.get(&entity_type, id) {
            Some(cached) => {
                cached.write().refresh_from(entity);
                cached
            }
            None => {
                let shared = entity.into_shared();
                self.cache.put(&entity_type, id, Arc::clone(&shared));
                shared
            }
        }
    }

    /// Returns the latest server revision.
    pub fn latest_revision(&self) -> WeblingResult<u64> {
        let data = self.transport.get("/replicate", &[])?;
        data.get("revision")
            .ok_or_else(|| WeblingError::parse("replication response without \"revision\""))
            .and_then(parse_id)
    }

    /// Returns the changes since `revision`.
    ///
    /// The cache is not touched; see [`EntityManager::evict_changed`].
    pub fn changes(&self, revision: u64) -> WeblingResult<ChangeSet> {
        let data = self.transport.get(&format!("/replicate/{revision}"), &[])?;
        ChangeSet::from_payload(revision, &data)
    }

    /// Evicts cached entities that were updated or deleted in `changes`.
    ///
    /// Returns the number of evicted entries.
    pub fn evict_changed(&mut self, changes: &ChangeSet) -> usize {
        let mut evicted = 0;
        for entity_type in changes.types() {
            let Some(type_changes) = changes.changes(entity_type) else {
                continue;
            };
            for &id in type_changes.updated.iter().chain(&type_changes.deleted) {
                if self.cache.remove(entity_type, id).is_some() {
                    evicted += 1;
                }
            }
        }
        debug!(evicted, "evicted changed entities");
        evicted
    }

    /// Returns a repository for `entity_type`.
    pub fn repository(&mut self, entity_type: impl Into<String>) -> Repository<'_, T, F> {
        Repository::new(self, entity_type)
    }

    fn load_definition_if_typed(&mut self) -> WeblingResult<()> {
        if self.config.typed_properties && self.definition.is_none() {
            self.definition()?;
        }
        Ok(())
    }

    fn hydrate(&self, entity_type: &str, id: u64, raw: &Value) -> WeblingResult<Entity> {
        let type_definition = self
            .definition
            .as_ref()
            .and_then(|definition| definition.get(entity_type));
        self.factory.create(entity_type, id, raw, type_definition)
    }
}

impl<T: Transport, F: EntityFactory> fmt::Debug for EntityManager<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityManager")
            .field("config", &self.config)
            .field("cached", &self.cache.len())
            .field("definition_loaded", &self.definition.is_some())
            .finish_non_exhaustive()
    }
}
