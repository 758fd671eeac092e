//! Entity type definitions and property coercion.

use crate::error::{WeblingError, WeblingResult};
use crate::property::value::{parse_date, parse_timestamp, FileRef, ImageRef, PropertyValue};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Property datatypes understood by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    /// Server-assigned counter.
    Autoincrement,
    /// Integer.
    Int,
    /// Decimal number.
    Numeric,
    /// Boolean.
    Bool,
    /// Single-line text.
    Text,
    /// Multi-line text.
    Longtext,
    /// File attachment.
    File,
    /// Image attachment.
    Image,
    /// Calendar date.
    Date,
    /// Date and time.
    Timestamp,
}

impl Datatype {
    /// Resolves a datatype tag from the definition.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "autoincrement" => Datatype::Autoincrement,
            "int" => Datatype::Int,
            "numeric" => Datatype::Numeric,
            "bool" => Datatype::Bool,
            "text" => Datatype::Text,
            "longtext" => Datatype::Longtext,
            "file" => Datatype::File,
            "image" => Datatype::Image,
            "date" => Datatype::Date,
            "timestamp" => Datatype::Timestamp,
            _ => return None,
        })
    }

    /// Converts a raw value to this datatype.
    ///
    /// Scalar datatypes pass the value through. `null` stays `null` for
    /// every datatype.
    pub fn coerce(self, raw: &Value) -> WeblingResult<PropertyValue> {
        if raw.is_null() {
            return Ok(PropertyValue::Null);
        }

        match self {
            Datatype::Autoincrement
            | Datatype::Int
            | Datatype::Numeric
            | Datatype::Bool
            | Datatype::Text
            | Datatype::Longtext => Ok(PropertyValue::from_json(raw)),
            Datatype::Date => Ok(PropertyValue::Date(parse_date(expect_str(raw)?)?)),
            Datatype::Timestamp => Ok(PropertyValue::Timestamp(parse_timestamp(expect_str(raw)?)?)),
            Datatype::File => Ok(PropertyValue::File(FileRef::deserialize(raw)?)),
            Datatype::Image => Ok(PropertyValue::Image(ImageRef::deserialize(raw)?)),
        }
    }
}

fn expect_str(raw: &Value) -> WeblingResult<&str> {
    raw.as_str()
        .ok_or_else(|| WeblingError::parse(format!("expected a string, got {raw}")))
}

/// Definition of one property of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyDef {
    /// Property ID.
    #[serde(default)]
    pub id: Option<u64>,
    /// Property title, used as the key in entity payloads.
    pub title: String,
    /// Datatype tag.
    pub datatype: String,
}

/// Property definitions of one entity type.
///
/// Lookups by title and by ID are precomputed when the definition is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeDefinition {
    entity_type: String,
    by_title: HashMap<String, PropertyDef>,
    title_by_id: HashMap<u64, String>,
}

impl TypeDefinition {
    /// Builds a type definition from property definitions.
    pub fn new(
        entity_type: impl Into<String>,
        properties: impl IntoIterator<Item = PropertyDef>,
    ) -> Self {
        let mut by_title = HashMap::new();
        let mut title_by_id = HashMap::new();

        for property in properties {
            if let Some(id) = property.id {
                title_by_id.insert(id, property.title.clone());
            }
            by_title.insert(property.title.clone(), property);
        }

        Self {
            entity_type: entity_type.into(),
            by_title,
            title_by_id,
        }
    }

    /// Parses the definition object of one type.
    ///
    /// `properties` may be a list of property objects or an object keyed by
    /// property ID.
    pub fn from_json(entity_type: &str, raw: &Value) -> WeblingResult<Self> {
        let mut properties = Vec::new();

        match raw.get("properties") {
            Some(Value::Array(items)) => {
                for item in items {
                    properties.push(PropertyDef::deserialize(item)?);
                }
            }
            Some(Value::Object(items)) => {
                for (key, item) in items {
                    let mut property = PropertyDef::deserialize(item)?;
                    if property.id.is_none() {
                        property.id = key.parse().ok();
                    }
                    properties.push(property);
                }
            }
            Some(Value::Null) | None => {}
            Some(other) => {
                return Err(WeblingError::parse(format!(
                    "unexpected properties for {entity_type}: {other}"
                )))
            }
        }

        Ok(Self::new(entity_type, properties))
    }

    /// Returns the entity type.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Returns the number of properties.
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    /// Returns true if the type has no properties.
    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    /// Returns the definition of a property by title.
    pub fn property(&self, title: &str) -> WeblingResult<&PropertyDef> {
        self.by_title
            .get(title)
            .ok_or_else(|| {
                WeblingError::unknown_property(&self.entity_type, format!("\"{title}\""))
            })
    }

    /// Returns the title of a property by ID.
    pub fn property_name(&self, id: u64) -> WeblingResult<&str> {
        self.title_by_id
            .get(&id)
            .map(String::as_str)
            .ok_or_else(|| {
                WeblingError::unknown_property(&self.entity_type, format!("with ID {id}"))
            })
    }

    /// Converts a raw property value to its declared datatype.
    ///
    /// # Errors
    ///
    /// - [`WeblingError::UnknownProperty`] if the title is not defined
    /// - [`WeblingError::UnsupportedDatatype`] for unknown datatype tags
    /// - [`WeblingError::Parse`] if the value does not fit the datatype
    pub fn coerce(&self, title: &str, raw: &Value) -> WeblingResult<PropertyValue> {
        let property = self.property(title)?;
        let datatype =
            Datatype::from_tag(&property.datatype).ok_or_else(|| WeblingError::UnsupportedDatatype {
                property: title.to_string(),
                datatype: property.datatype.clone(),
            })?;
        datatype.coerce(raw)
    }
}

/// Definitions of all entity types of an account.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Definition {
    types: HashMap<String, TypeDefinition>,
}

impl Definition {
    /// Parses the full definition response.
    ///
    /// The response is an object keyed by entity type. Entries without
    /// property information are kept as empty type definitions.
    pub fn from_json(raw: &Value) -> WeblingResult<Self> {
        let object = raw
            .as_object()
            .ok_or_else(|| WeblingError::parse("definition must be a JSON object"))?;

        let mut types = HashMap::with_capacity(object.len());
        for (entity_type, body) in object {
            if !body.is_object() {
                continue;
            }
            types.insert(entity_type.clone(), TypeDefinition::from_json(entity_type, body)?);
        }

        debug!(types = types.len(), "parsed entity definition");
        Ok(Self { types })
    }

    /// Returns the definition of one type.
    pub fn get(&self, entity_type: &str) -> Option<&TypeDefinition> {
        self.types.get(entity_type)
    }

    /// Iterates over the defined type names.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Adds or replaces a type definition.
    pub fn insert(&mut self, definition: TypeDefinition) {
        self.types.insert(definition.entity_type.clone(), definition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn member_definition() -> Value {
        json!({
            "member": {
                "properties": [
                    {"id": 1, "title": "Vorname", "datatype": "text"},
                    {"id": 2, "title": "Geburtstag", "datatype": "date"},
                    {"id": 3, "title": "Foto", "datatype": "image"},
                    {"id": 4, "title": "Status", "datatype": "enum"}
                ]
            },
            "membergroup": {
                "properties": {
                    "10": {"title": "Name", "datatype": "text"}
                }
            },
            "settings": "ignored"
        })
    }

    #[test]
    fn parses_list_and_map_properties() {
        let def = Definition::from_json(&member_definition()).unwrap();

        let member = def.get("member").unwrap();
        assert_eq!(member.len(), 4);
        assert_eq!(member.property_name(2).unwrap(), "Geburtstag");

        let group = def.get("membergroup").unwrap();
        assert_eq!(group.property_name(10).unwrap(), "Name");
        assert!(def.get("settings").is_none());
    }

    #[test]
    fn coerces_by_datatype() {
        let def = Definition::from_json(&member_definition()).unwrap();
        let member = def.get("member").unwrap();

        assert_eq!(
            member.coerce("Vorname", &json!("Max")).unwrap(),
            PropertyValue::Text("Max".into())
        );

        let date = member.coerce("Geburtstag", &json!("1990-05-17")).unwrap();
        assert_eq!(date.to_json(), json!("1990-05-17"));

        assert_eq!(member.coerce("Geburtstag", &json!(null)).unwrap(), PropertyValue::Null);
    }

    #[test]
    fn unknown_property_and_datatype() {
        let def = Definition::from_json(&member_definition()).unwrap();
        let member = def.get("member").unwrap();

        assert!(matches!(
            member.coerce("Nachname", &json!("x")),
            Err(WeblingError::UnknownProperty { .. })
        ));
        assert!(matches!(
            member.property_name(99),
            Err(WeblingError::UnknownProperty { .. })
        ));
        assert_eq!(
            member.coerce("Status", &json!("active")).unwrap_err(),
            WeblingError::UnsupportedDatatype {
                property: "Status".into(),
                datatype: "enum".into(),
            }
        );
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let err = Datatype::File.coerce(&json!({"href": 1})).unwrap_err();
        assert!(matches!(err, WeblingError::Parse { .. }));
    }

    #[test]
    fn definition_must_be_object() {
        assert!(Definition::from_json(&json!([])).is_err());
    }
}
