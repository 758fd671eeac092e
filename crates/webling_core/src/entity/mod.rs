//! Entity types.

mod factory;
mod id;
mod kind;
mod list;
mod model;

pub use factory::{DefaultEntityFactory, EntityFactory};
pub use id::Identity;
pub use kind::EntityKind;
pub use list::EntityList;
pub use model::{Entity, SharedEntity};

pub(crate) use factory::{id_list, parse_id};
