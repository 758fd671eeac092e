//! # Webling Query
//!
//! Filter query DSL for the Webling API.
//!
//! The remote store filters list requests with a string-based, flat infix
//! language. This crate builds such strings from typed pieces:
//!
//! - [`Parameter`]: one condition on one property, optionally negated
//! - [`Query`]: an ordered AND/OR group of parameters and nested groups
//! - [`QueryBuilder`]: a fluent front-end producing a [`Query`]
//!
//! ## Rendering Rules
//!
//! - Property names made of `[A-Za-z0-9,*]` are written bare, all others
//!   are wrapped in back-ticks
//! - Literal values are double-quoted, `IN` lists are comma separated
//! - Comparing against another [`Parameter`] writes its property name
//! - Negation wraps the condition as `NOT (...)`
//! - Nested groups with more than one condition are parenthesized
//!
//! ## Usage
//!
//! ```
//! use webling_query::QueryBuilder;
//!
//! let query = QueryBuilder::new()
//!     .property("Vorname")
//!     .is_equal_to("Max")
//!     .and("Geburtstag")
//!     .is_greater_or_equal_than("2000-01-01")
//!     .into_query();
//!
//! assert_eq!(
//!     query.build().unwrap(),
//!     "Vorname = \"Max\" AND Geburtstag >= \"2000-01-01\""
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod error;
mod parameter;
mod query;

pub use builder::{ConditionBuilder, QueryBuilder};
pub use error::{QueryError, QueryResult};
pub use parameter::{escape_property, escape_value, Comparator, Condition, Operand, Parameter};
pub use query::{Joiner, Node, Query};
