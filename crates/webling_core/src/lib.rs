//! # Webling Core
//!
//! Entity manager and identity cache for the Webling API.
//!
//! The [`EntityManager`] is the single entry point for reading and writing
//! remote entities. It keeps exactly one live instance per remote identity,
//! so every holder of a [`SharedEntity`] sees the same state.
//!
//! ## Key Types
//!
//! - [`EntityManager`]: find, persist and remove entities, read change sets
//! - [`Entity`]: a member, group, document or any other remote object
//! - [`Transport`]: the seam to the remote store ([`MockTransport`] for tests)
//! - [`ChangeSet`]: created, updated and deleted IDs since a revision
//! - [`Definition`]: property datatypes used to coerce values
//!
//! ## Usage
//!
//! ```
//! use serde_json::json;
//! use webling_core::{EntityManager, MockTransport};
//!
//! let transport = MockTransport::new();
//! transport.on_get("/member/7", json!({"properties": {"Vorname": "Max"}}));
//!
//! let mut manager = EntityManager::new(&transport);
//! let member = manager.find("member", 7).unwrap();
//! let again = manager.find("member", 7).unwrap();
//!
//! assert!(std::sync::Arc::ptr_eq(&member, &again));
//! assert_eq!(transport.request_count(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod changes;
mod config;
mod entity;
mod error;
mod manager;
mod property;
mod repository;
mod transport;

pub use cache::IdentityCache;
pub use changes::{ChangeSet, TypeChanges};
pub use config::ManagerConfig;
pub use entity::{
    DefaultEntityFactory, Entity, EntityFactory, EntityKind, EntityList, Identity, SharedEntity,
};
pub use error::{WeblingError, WeblingResult};
pub use manager::{prepare_order, EntityManager, SortDirection};
pub use property::{
    parse_date, parse_timestamp, Datatype, Definition, FileRef, ImageRef, PropertyDef,
    PropertyValue, TypeDefinition, DATE_FORMAT, TIMESTAMP_FORMAT,
};
pub use repository::Repository;
pub use transport::{Method, MockTransport, RecordedRequest, Transport};

pub use webling_query::{Query, QueryBuilder};

/// API version used by this client.
pub const API_VERSION: u32 = 1;
