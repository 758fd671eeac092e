//! Entity hydration from API objects.

use crate::entity::model::Entity;
use crate::error::{WeblingError, WeblingResult};
use crate::property::{PropertyValue, TypeDefinition};
use serde_json::Value;
use std::collections::BTreeMap;

/// Builds entities from raw API objects.
pub trait EntityFactory: Send + Sync {
    /// Creates an entity of `entity_type` with `id` from a raw object.
    ///
    /// When `definition` is given, property values are coerced to their
    /// declared datatypes.
    fn create(
        &self,
        entity_type: &str,
        id: u64,
        raw: &Value,
        definition: Option<&TypeDefinition>,
    ) -> WeblingResult<Entity>;
}

/// Factory for the standard API object layout.
///
/// Expected shape: `{"readonly": bool, "properties": {..}, "children":
/// {type: [ids]}, "parents": [ids], "links": {type: [ids]}}`. Missing keys
/// are treated as empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEntityFactory;

impl EntityFactory for DefaultEntityFactory {
    fn create(
        &self,
        entity_type: &str,
        id: u64,
        raw: &Value,
        definition: Option<&TypeDefinition>,
    ) -> WeblingResult<Entity> {
        let object = raw.as_object().ok_or_else(|| {
            WeblingError::parse(format!("{entity_type}/{id}: expected a JSON object"))
        })?;

        let readonly = object
            .get("readonly")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut properties = BTreeMap::new();
        if let Some(raw_properties) = object.get("properties").and_then(Value::as_object) {
            for (name, value) in raw_properties {
                let value = match definition {
                    Some(definition) => definition.coerce(name, value)?,
                    None => PropertyValue::from_json(value),
                };
                properties.insert(name.clone(), value);
            }
        }

        let mut entity = Entity::new(entity_type).with_id(id).with_readonly(readonly);
        entity.set_properties(properties);

        for (child_type, ids) in id_map(object.get("children"))? {
            entity = entity.with_children(child_type, ids);
        }
        entity.set_parents(id_list(object.get("parents"))?);
        for (link_type, ids) in id_map(object.get("links"))? {
            entity.set_links(link_type, ids);
        }

        Ok(entity)
    }
}

/// Parses an entity ID from a number or a numeric string.
pub(crate) fn parse_id(raw: &Value) -> WeblingResult<u64> {
    match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| WeblingError::parse(format!("invalid entity ID: {raw}")))
}

pub(crate) fn id_list(raw: Option<&Value>) -> WeblingResult<Vec<u64>> {
    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.iter().map(parse_id).collect(),
        Some(other) => Err(WeblingError::parse(format!("expected a list of IDs, got {other}"))),
    }
}

fn id_map(raw: Option<&Value>) -> WeblingResult<Vec<(String, Vec<u64>)>> {
    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),
        // The API encodes an empty map as an empty list.
        Some(Value::Array(items)) if items.is_empty() => Ok(Vec::new()),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, ids)| Ok((key.clone(), id_list(Some(ids))?)))
            .collect(),
        Some(other) => Err(WeblingError::parse(format!("expected an ID map, got {other}"))),
    }
}
