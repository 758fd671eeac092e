//! Per-type repositories.

use crate::entity::{DefaultEntityFactory, EntityFactory, EntityList, SharedEntity};
use crate::error::WeblingResult;
use crate::manager::EntityManager;
use crate::transport::Transport;
use webling_query::Query;

/// Entity access bound to one entity type.
#[derive(Debug)]
pub struct Repository<'m, T: Transport, F: EntityFactory = DefaultEntityFactory> {
    manager: &'m mut EntityManager<T, F>,
    entity_type: String,
}

impl<'m, T: Transport, F: EntityFactory> Repository<'m, T, F> {
    /// Creates a repository for `entity_type`.
    pub fn new(manager: &'m mut EntityManager<T, F>, entity_type: impl Into<String>) -> Self {
        Self {
            manager,
            entity_type: entity_type.into(),
        }
    }

    /// Returns the entity type.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Lists all entities of this type.
    pub fn find_all(&mut self, order: &[(&str, &str)], full: bool) -> WeblingResult<EntityList> {
        self.manager.find_all(&self.entity_type, None, order, full)
    }

    /// Returns the entity with `id`.
    pub fn find_by_id(&mut self, id: u64) -> WeblingResult<SharedEntity> {
        self.manager.find(&self.entity_type, id)
    }

    /// Lists entities of this type matching `query`.
    pub fn find_by(
        &mut self,
        query: &Query,
        order: &[(&str, &str)],
        full: bool,
    ) -> WeblingResult<EntityList> {
        self.manager.find_by(&self.entity_type, query, order, full)
    }
}

#[cfg(test)]
mod tests {
    use crate::transport::MockTransport;
    use crate::EntityManager;
    use serde_json::json;
    use webling_query::QueryBuilder;

    #[test]
    fn binds_type() {
        let transport = MockTransport::new();
        transport.on_get("/documentgroup", json!({"objects": [1, 2]}));
        transport.on_get("/documentgroup/1", json!({"properties": {"title": "Protokolle"}}));

        let mut manager = EntityManager::new(&transport);
        let mut groups = manager.repository("documentgroup");

        assert_eq!(groups.entity_type(), "documentgroup");
        assert_eq!(groups.find_all(&[], false).unwrap().ids(), &[1, 2]);

        let group = groups.find_by_id(1).unwrap();
        assert_eq!(group.read().entity_type(), "documentgroup");

        let query = QueryBuilder::new()
            .property("title")
            .filter("Proto")
            .into_query();
        groups.find_by(&query, &[("title", "ASC")], false).unwrap();

        let last = transport.last_request().unwrap();
        assert_eq!(last.param("filter"), Some(r#"title FILTER "Proto""#));
        assert_eq!(last.param("order"), Some("title ASC"));
    }
}
