//! Editor metadata kept beside the physics state.
//!
//! Neither table is physics state. Both are keyed by [`EntityRef`] and
//! stored in BTreeMaps so iteration order is deterministic.
//!
//! # Invariants
//! - A custom property is keyed by (entity, name, type); one name may hold
//!   independent values under different types.
//! - Names and paths are last-write-wins per entity.
//!
//! [`EntityRef`]: scenejson_common::EntityRef

pub mod names;
pub mod properties;

pub use names::NameRegistry;
pub use properties::{CustomValue, PropertyStore, PropertyType, PropertyValue};
