//! Shared types: entity identities, entity references and small value types
//! used by the scene model, the metadata side tables and the codec.

pub mod types;

pub use glam::Vec2;
pub use types::{BodyId, Color4, EntityKind, EntityRef, FixtureId, ImageId, JointId};
