//! Property values and entity definitions.

mod definition;
mod value;

pub use definition::{Datatype, Definition, PropertyDef, TypeDefinition};
pub use value::{
    parse_date, parse_timestamp, FileRef, ImageRef, PropertyValue, DATE_FORMAT, TIMESTAMP_FORMAT,
};
