//! Typed property values.

use crate::error::{WeblingError, WeblingResult};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Date format used by the API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format used by the API.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses an API date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> WeblingResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| WeblingError::parse(format!("invalid date \"{raw}\": {e}")))
}

/// Parses an API timestamp (`YYYY-MM-DD HH:MM:SS`, `T` separator accepted).
pub fn parse_timestamp(raw: &str) -> WeblingResult<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| WeblingError::parse(format!("invalid timestamp \"{raw}\": {e}")))
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// A file stored in a file property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    /// Download location.
    pub href: String,
    /// Size in bytes.
    pub size: u64,
    /// File extension.
    pub ext: String,
    /// MIME type.
    pub mime: String,
    /// Last modification.
    #[serde(with = "timestamp_format")]
    pub timestamp: NaiveDateTime,
}

/// An image stored in an image property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// File metadata.
    #[serde(flatten)]
    pub file: FileRef,
    /// Image dimensions as reported by the API.
    #[serde(default)]
    pub dimensions: Value,
}

/// The value of an entity property.
///
/// Values hydrated without a definition are untyped: JSON scalars map to the
/// matching scalar variant and anything else is kept as [`PropertyValue::Raw`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
    /// No value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Decimal number.
    Numeric(f64),
    /// Text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time.
    Timestamp(NaiveDateTime),
    /// File attachment.
    File(FileRef),
    /// Image attachment.
    Image(ImageRef),
    /// Any other JSON value.
    Raw(Value),
}

impl PropertyValue {
    /// Converts a raw JSON value without type information.
    pub fn from_json(raw: &Value) -> Self {
        match raw {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => PropertyValue::Int(i),
                None => n
                    .as_f64()
                    .map(PropertyValue::Numeric)
                    .unwrap_or_else(|| PropertyValue::Raw(raw.clone())),
            },
            Value::String(s) => PropertyValue::Text(s.clone()),
            other => PropertyValue::Raw(other.clone()),
        }
    }

    /// Converts the value to its API representation.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Null => Value::Null,
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Int(i) => Value::from(*i),
            PropertyValue::Numeric(n) => Value::from(*n),
            PropertyValue::Text(s) => Value::String(s.clone()),
            PropertyValue::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
            PropertyValue::Timestamp(ts) => Value::String(ts.format(TIMESTAMP_FORMAT).to_string()),
            PropertyValue::File(file) => serde_json::to_value(file).unwrap_or(Value::Null),
            PropertyValue::Image(image) => serde_json::to_value(image).unwrap_or(Value::Null),
            PropertyValue::Raw(raw) => raw.clone(),
        }
    }

    /// Returns true for [`PropertyValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Returns the text, if this is a text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number, for integer and numeric values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Int(i) => Some(*i as f64),
            PropertyValue::Numeric(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the date, if this is a date value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            PropertyValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the timestamp, if this is a timestamp value.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            PropertyValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Returns the file, for file and image values.
    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            PropertyValue::File(file) => Some(file),
            PropertyValue::Image(image) => Some(&image.file),
            _ => None,
        }
    }

    /// Returns the image, if this is an image value.
    pub fn as_image(&self) -> Option<&ImageRef> {
        match self {
            PropertyValue::Image(image) => Some(image),
            _ => None,
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Numeric(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<NaiveDate> for PropertyValue {
    fn from(value: NaiveDate) -> Self {
        PropertyValue::Date(value)
    }
}

impl From<NaiveDateTime> for PropertyValue {
    fn from(value: NaiveDateTime) -> Self {
        PropertyValue::Timestamp(value)
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(PropertyValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file_json() -> Value {
        json!({
            "href": "/api/1/member/12/image/photo.jpg",
            "size": 1024,
            "ext": "jpg",
            "mime": "image/jpeg",
            "timestamp": "2015-06-22 14:13:38"
        })
    }

    #[test]
    fn untyped_scalars() {
        assert_eq!(PropertyValue::from_json(&json!(null)), PropertyValue::Null);
        assert_eq!(PropertyValue::from_json(&json!(true)), PropertyValue::Bool(true));
        assert_eq!(PropertyValue::from_json(&json!(3)), PropertyValue::Int(3));
        assert_eq!(PropertyValue::from_json(&json!(2.5)), PropertyValue::Numeric(2.5));
        assert_eq!(PropertyValue::from_json(&json!("x")), PropertyValue::Text("x".into()));
        assert_eq!(
            PropertyValue::from_json(&json!([1, 2])),
            PropertyValue::Raw(json!([1, 2]))
        );
    }

    #[test]
    fn date_and_timestamp_format() {
        let date = parse_date("2020-02-29").unwrap();
        assert_eq!(PropertyValue::Date(date).to_json(), json!("2020-02-29"));

        let ts = parse_timestamp("2015-06-22 14:13:38").unwrap();
        assert_eq!(
            PropertyValue::Timestamp(ts).to_json(),
            json!("2015-06-22 14:13:38")
        );
        assert_eq!(parse_timestamp("2015-06-22T14:13:38").unwrap(), ts);
    }

    #[test]
    fn malformed_dates_are_parse_errors() {
        assert!(matches!(parse_date("22.06.2015"), Err(WeblingError::Parse { .. })));
        assert!(matches!(parse_timestamp("yesterday"), Err(WeblingError::Parse { .. })));
    }

    #[test]
    fn file_roundtrip() {
        let file: FileRef = serde_json::from_value(file_json()).unwrap();
        assert_eq!(file.size, 1024);
        assert_eq!(PropertyValue::File(file).to_json(), file_json());
    }

    #[test]
    fn image_keeps_dimensions() {
        let mut raw = file_json();
        raw["dimensions"] = json!({"width": 640, "height": 480});

        let image: ImageRef = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(image.file.ext, "jpg");

        let value = PropertyValue::Image(image);
        assert_eq!(value.as_file().map(|f| f.mime.as_str()), Some("image/jpeg"));
        assert_eq!(value.to_json(), raw);
    }

    #[test]
    fn serializes_like_to_json() {
        let value = PropertyValue::from(Some("Max"));
        assert_eq!(serde_json::to_value(&value).unwrap(), json!("Max"));
        assert_eq!(PropertyValue::from(None::<i64>), PropertyValue::Null);
    }
}
